use chrono::{Duration, NaiveDate};

use super::domain::{CaseStatus, LegalCase};
use crate::config::DeadlineConfig;

/// Grace period, in days, granted after entering `status`.
fn grace_days(status: CaseStatus, config: &DeadlineConfig) -> Option<i64> {
    use CaseStatus::*;
    match status {
        PreJudicial => Some(config.notice_days),
        ExtrajudicialNotice | WaitingResponse => Some(config.response_days),
        DemandPreparation | DemandFiled => Some(config.filing_days),
        CourtProcess | HearingScheduled | JudgmentPending => Some(config.court_days),
        JudgmentIssued => Some(config.judgment_days),
        EvictionOrdered | EvictionCompleted => Some(config.execution_days),
        PaymentCollection => Some(config.collection_days),
        CaseClosed | SettlementReached | Dismissed => None,
    }
}

/// Computes the next action deadline for a case that entered its current
/// status on `anchor`. Pure; terminal states have no deadline. A scheduled
/// court date takes precedence over the configured grace period while the
/// hearing is pending.
pub fn next_deadline(
    case: &LegalCase,
    anchor: NaiveDate,
    config: &DeadlineConfig,
) -> Option<NaiveDate> {
    if case.status.is_terminal() {
        return None;
    }

    if matches!(
        case.status,
        CaseStatus::HearingScheduled | CaseStatus::JudgmentPending
    ) {
        if let Some(court_date) = case.court_date {
            if court_date >= anchor {
                return Some(court_date);
            }
        }
    }

    grace_days(case.status, config).map(|days| anchor + Duration::days(days))
}
