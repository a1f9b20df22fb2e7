//! Periodic escalation sweep over non-terminal cases and open disputes.
//!
//! The sweep is advisory: lapsed deadlines raise escalation events for a
//! human actor to act on, they never auto-transition a case. Each case is
//! processed independently on a bounded worker pool; per-case failures are
//! collected into the report instead of aborting the sweep.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cases::accrual::{self, RecomputationError};
use crate::cases::classify;
use crate::cases::deadlines;
use crate::cases::domain::{CaseId, CaseNumber, LegalCase, RiskLevel};
use crate::cases::repository::{CaseRepository, RepositoryError};
use crate::config::EngineConfig;
use crate::disputes::repository::DisputeRepository;
use crate::disputes::{DisputeId, DisputeNumber};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EscalationSubject {
    Case {
        id: CaseId,
        case_number: CaseNumber,
    },
    Dispute {
        id: DisputeId,
        dispute_number: DisputeNumber,
    },
}

/// Advisory alert raised when a deadline lapses without a recorded action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationEvent {
    pub subject: EscalationSubject,
    pub lapsed_deadline: NaiveDate,
    pub risk_level: RiskLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SweepError {
    #[error(transparent)]
    Recomputation(#[from] RecomputationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepFailure {
    pub case_id: CaseId,
    pub error: SweepError,
}

/// Fatal only when the sweep cannot read the backlog at all.
#[derive(Debug, thiserror::Error)]
pub enum SweepFatalError {
    #[error("unable to list active cases: {0}")]
    CaseList(RepositoryError),
    #[error("unable to list open disputes: {0}")]
    DisputeList(RepositoryError),
}

#[derive(Debug, Default)]
pub struct SweepReport {
    pub refreshed: Vec<CaseId>,
    pub escalations: Vec<EscalationEvent>,
    pub failures: Vec<SweepFailure>,
    pub cancelled: bool,
}

struct CaseOutcome {
    case_id: CaseId,
    escalation: Option<EscalationEvent>,
}

pub struct EscalationSweep<R, D> {
    cases: Arc<R>,
    disputes: Arc<D>,
    config: EngineConfig,
}

impl<R, D> EscalationSweep<R, D>
where
    R: CaseRepository + 'static,
    D: DisputeRepository + 'static,
{
    pub fn new(cases: Arc<R>, disputes: Arc<D>, config: EngineConfig) -> Self {
        Self {
            cases,
            disputes,
            config,
        }
    }

    /// Runs one sweep as of `now`. Cancellation is cooperative: the flag is
    /// checked between cases, never in the middle of a case update.
    pub fn run(
        &self,
        now: NaiveDate,
        cancel: &AtomicBool,
    ) -> Result<SweepReport, SweepFatalError> {
        let backlog = self.cases.list_active().map_err(SweepFatalError::CaseList)?;
        let total = backlog.len();

        let queue = Mutex::new(VecDeque::from(backlog));
        let report = Mutex::new(SweepReport::default());
        let workers = self.config.sweep.workers.max(1);

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| loop {
                    if cancel.load(Ordering::Relaxed) {
                        report.lock().expect("sweep report poisoned").cancelled = true;
                        break;
                    }
                    let Some(case) = queue
                        .lock()
                        .expect("sweep queue poisoned")
                        .pop_front()
                    else {
                        break;
                    };

                    let case_id = case.id.clone();
                    let result = self.process_case(case, now);
                    let mut report = report.lock().expect("sweep report poisoned");
                    match result {
                        Ok(outcome) => {
                            report.refreshed.push(outcome.case_id);
                            if let Some(event) = outcome.escalation {
                                report.escalations.push(event);
                            }
                        }
                        Err(error) => {
                            tracing::warn!(
                                case_id = %case_id.0,
                                error = %error,
                                "case skipped during escalation sweep"
                            );
                            report.failures.push(SweepFailure { case_id, error });
                        }
                    }
                });
            }
        });

        let mut report = report.into_inner().expect("sweep report poisoned");

        if !report.cancelled {
            self.sweep_disputes(now, cancel, &mut report)?;
        }

        tracing::info!(
            cases = total,
            refreshed = report.refreshed.len(),
            escalations = report.escalations.len(),
            failures = report.failures.len(),
            cancelled = report.cancelled,
            "escalation sweep finished"
        );
        Ok(report)
    }

    /// Refreshes one case: recompute amounts and classification as of `now`
    /// so displayed figures are current, and escalate a lapsed deadline at
    /// most once. Writes go through the same versioned path as interactive
    /// transitions.
    fn process_case(&self, case: LegalCase, now: NaiveDate) -> Result<CaseOutcome, SweepError> {
        let expected_version = case.version;
        let mut updated = case;

        updated.financials = accrual::compute_amounts(&updated, now, &self.config.accrual)?;

        // A lapsed deadline raises risk and an event exactly once; later
        // sweeps see it marked and stay quiet until the deadline moves.
        let mut lapsed = None;
        if let Some(deadline) = updated.next_deadline {
            if now > deadline && updated.last_escalated_deadline != Some(deadline) {
                updated.missed_deadlines += 1;
                updated.last_escalated_deadline = Some(deadline);
                // Re-anchor to the sweep date; a stored deadline never
                // trails the update stamp on a non-terminal case.
                updated.next_deadline =
                    deadlines::next_deadline(&updated, now, &self.config.deadlines);
                lapsed = Some(deadline);
            }
        }

        let classification = classify::classify(&updated, now, &self.config.classifier);
        updated.priority = classification.priority;
        updated.risk_level = classification.risk_level;

        let escalation = lapsed.map(|deadline| EscalationEvent {
            subject: EscalationSubject::Case {
                id: updated.id.clone(),
                case_number: updated.case_number.clone(),
            },
            lapsed_deadline: deadline,
            risk_level: updated.risk_level,
            message: format!(
                "deadline {} lapsed without action in status {}",
                deadline,
                updated.status.label()
            ),
        });

        updated.updated_on = now;
        updated.version += 1;
        let case_id = updated.id.clone();
        self.cases.save(updated, expected_version)?;

        Ok(CaseOutcome { case_id, escalation })
    }

    /// Open disputes past the SLA raise advisory escalations; the sweep
    /// never mutates a dispute.
    fn sweep_disputes(
        &self,
        now: NaiveDate,
        cancel: &AtomicBool,
        report: &mut SweepReport,
    ) -> Result<(), SweepFatalError> {
        let open = self
            .disputes
            .list_open()
            .map_err(SweepFatalError::DisputeList)?;

        for dispute in open {
            if cancel.load(Ordering::Relaxed) {
                report.cancelled = true;
                break;
            }
            let days_open = dispute.days_open(now);
            if days_open > self.config.classifier.sla_days {
                report.escalations.push(EscalationEvent {
                    subject: EscalationSubject::Dispute {
                        id: dispute.id.clone(),
                        dispute_number: dispute.dispute_number.clone(),
                    },
                    lapsed_deadline: dispute.opened_on
                        + chrono::Duration::days(self.config.classifier.sla_days),
                    risk_level: RiskLevel::Medium,
                    message: format!(
                        "dispute open for {days_open} days, past the {}-day SLA",
                        self.config.classifier.sla_days
                    ),
                });
            }
        }
        Ok(())
    }
}
