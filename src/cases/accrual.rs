use chrono::NaiveDate;

use super::domain::{CaseFinancials, LegalCase};
use crate::config::AccrualConfig;

/// Days per accrual month. Monthly rates are prorated against this base.
const DAYS_PER_MONTH: i64 = 30;
const BPS_SCALE: i128 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecomputationError {
    #[error("evaluation date {as_of} precedes first default {first_default}")]
    EvaluationBeforeDefault {
        as_of: NaiveDate,
        first_default: NaiveDate,
    },
    #[error("case snapshot is inconsistent: {0}")]
    InconsistentSnapshot(&'static str),
}

/// Recomputes interest, fees, and the owed total as of `as_of`.
///
/// Pure function of the case snapshot, the evaluation date, and the
/// configured rates; safe to call on every read. All arithmetic is integer
/// minor units with round-half-up at the smallest unit.
pub fn compute_amounts(
    case: &LegalCase,
    as_of: NaiveDate,
    config: &AccrualConfig,
) -> Result<CaseFinancials, RecomputationError> {
    if case.financials.total_debt < 0 {
        return Err(RecomputationError::InconsistentSnapshot(
            "total debt is negative",
        ));
    }
    if as_of < case.first_default_date {
        return Err(RecomputationError::EvaluationBeforeDefault {
            as_of,
            first_default: case.first_default_date,
        });
    }

    let total_debt = case.financials.total_debt;
    let days = (as_of - case.first_default_date).num_days();

    let accumulated_interest = if config.compound_monthly {
        compound_interest(total_debt, config.monthly_interest_bps, days)
    } else {
        simple_interest(total_debt, config.monthly_interest_bps, days)
    };

    let mut legal_fees = 0i64;
    let mut court_fees = 0i64;
    for phase in &case.phases_entered {
        legal_fees += config.legal_fee_per_phase.fee_for(*phase);
        court_fees += config.court_fee_per_phase.fee_for(*phase);
    }

    let total_amount = total_debt + accumulated_interest + legal_fees + court_fees;

    Ok(CaseFinancials {
        total_debt,
        accumulated_interest,
        legal_fees,
        court_fees,
        total_amount,
    })
}

/// Round-half-up integer division; numerator and denominator are positive.
fn div_round_half_up(numerator: i128, denominator: i128) -> i64 {
    ((numerator + denominator / 2) / denominator) as i64
}

fn simple_interest(principal: i64, monthly_bps: u32, days: i64) -> i64 {
    div_round_half_up(
        principal as i128 * monthly_bps as i128 * days as i128,
        BPS_SCALE * DAYS_PER_MONTH as i128,
    )
}

/// Compounds at each whole 30-day month, then accrues the remaining days as
/// simple interest on the compounded balance.
fn compound_interest(principal: i64, monthly_bps: u32, days: i64) -> i64 {
    let whole_months = days / DAYS_PER_MONTH;
    let remainder_days = days % DAYS_PER_MONTH;

    let mut balance = principal;
    for _ in 0..whole_months {
        balance += div_round_half_up(balance as i128 * monthly_bps as i128, BPS_SCALE);
    }
    balance += simple_interest(balance, monthly_bps, remainder_days);
    balance - principal
}
