use super::domain::{CasePhase, CaseStatus, DocumentKind, LegalCase};

/// Allowed-successor set for every status. This table is the single source
/// of truth for case progression; anything not listed here (other than the
/// universal settlement/dismissal exits) is an invalid transition.
pub fn allowed_successors(status: CaseStatus) -> &'static [CaseStatus] {
    use CaseStatus::*;
    match status {
        PreJudicial => &[ExtrajudicialNotice],
        ExtrajudicialNotice => &[WaitingResponse],
        WaitingResponse => &[DemandPreparation, ExtrajudicialNotice],
        DemandPreparation => &[DemandFiled],
        DemandFiled => &[CourtProcess],
        CourtProcess => &[HearingScheduled],
        HearingScheduled => &[JudgmentPending],
        JudgmentPending => &[JudgmentIssued],
        JudgmentIssued => &[EvictionOrdered, PaymentCollection],
        EvictionOrdered => &[EvictionCompleted],
        EvictionCompleted => &[CaseClosed],
        PaymentCollection => &[CaseClosed],
        CaseClosed | SettlementReached | Dismissed => &[],
    }
}

/// Settlement and dismissal are reachable from any non-terminal state.
pub fn is_universal_exit(target: CaseStatus) -> bool {
    matches!(
        target,
        CaseStatus::SettlementReached | CaseStatus::Dismissed
    )
}

pub fn is_allowed(from: CaseStatus, to: CaseStatus) -> bool {
    if from.is_terminal() {
        return false;
    }
    if is_universal_exit(to) {
        return true;
    }
    allowed_successors(from).contains(&to)
}

/// Procedural phase a case sits in once it has entered `status`.
pub const fn phase_for(status: CaseStatus) -> CasePhase {
    use CaseStatus::*;
    match status {
        PreJudicial | ExtrajudicialNotice | WaitingResponse | DemandPreparation => {
            CasePhase::PreJudicial
        }
        DemandFiled | CourtProcess | HearingScheduled | JudgmentPending | JudgmentIssued => {
            CasePhase::Judicial
        }
        EvictionOrdered | EvictionCompleted | PaymentCollection => CasePhase::Execution,
        CaseClosed | SettlementReached | Dismissed => CasePhase::Closed,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("transition from {} to {} is not allowed", from.label(), to.label())]
    InvalidTransition { from: CaseStatus, to: CaseStatus },
    #[error("precondition not met for {}: {requirement}", target.label())]
    PreconditionNotMet {
        target: CaseStatus,
        requirement: &'static str,
    },
    #[error("actor {actor} is not authorized to perform {action}")]
    Unauthorized { actor: String, action: String },
}

/// Validates an edge against the adjacency table and its preconditions
/// without mutating the case.
pub fn validate(case: &LegalCase, target: CaseStatus) -> Result<(), TransitionError> {
    if !is_allowed(case.status, target) {
        return Err(TransitionError::InvalidTransition {
            from: case.status,
            to: target,
        });
    }

    match target {
        CaseStatus::ExtrajudicialNotice if case.notices.is_empty() => {
            Err(TransitionError::PreconditionNotMet {
                target,
                requirement: "at least one extrajudicial notice must be recorded",
            })
        }
        CaseStatus::DemandFiled if !case.has_document(DocumentKind::Demand) => {
            Err(TransitionError::PreconditionNotMet {
                target,
                requirement: "a demand document must be attached",
            })
        }
        CaseStatus::HearingScheduled if case.court_date.is_none() => {
            Err(TransitionError::PreconditionNotMet {
                target,
                requirement: "a court date must be scheduled",
            })
        }
        CaseStatus::EvictionOrdered if !case.has_reached(CaseStatus::JudgmentIssued) => {
            Err(TransitionError::PreconditionNotMet {
                target,
                requirement: "a judgment must have been issued first",
            })
        }
        _ => Ok(()),
    }
}
