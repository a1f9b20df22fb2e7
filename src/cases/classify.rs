use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{CasePriority, CaseType, LegalCase, RiskLevel};
use crate::config::ClassifierConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub priority: CasePriority,
    pub risk_level: RiskLevel,
}

/// Derives priority and risk from the amount owed, days open, case type, and
/// missed-deadline count. Deterministic, and monotonic: a larger amount, more
/// days open, or more lapsed deadlines never lowers either classification.
pub fn classify(case: &LegalCase, as_of: NaiveDate, config: &ClassifierConfig) -> Classification {
    let amount = case.financials.total_amount;
    let days_open = case.days_open(as_of);

    let mut priority = priority_for_amount(amount, config);
    if days_open > config.sla_days {
        priority = priority.escalated();
    }

    let mut risk_level = risk_for_amount(amount, config);
    if matches!(
        case.case_type,
        CaseType::NonPayment | CaseType::IllegalOccupation
    ) && risk_level < RiskLevel::Medium
    {
        risk_level = RiskLevel::Medium;
    }
    for _ in 0..case.missed_deadlines {
        risk_level = risk_level.escalated();
    }

    Classification {
        priority,
        risk_level,
    }
}

fn priority_for_amount(amount: i64, config: &ClassifierConfig) -> CasePriority {
    if amount >= config.urgent_amount {
        CasePriority::Urgent
    } else if amount >= config.high_amount {
        CasePriority::High
    } else if amount >= config.medium_amount {
        CasePriority::Medium
    } else {
        CasePriority::Low
    }
}

fn risk_for_amount(amount: i64, config: &ClassifierConfig) -> RiskLevel {
    if amount >= config.urgent_amount {
        RiskLevel::High
    } else if amount >= config.high_amount {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
