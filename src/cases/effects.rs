use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{CaseId, Party, PartyRole};

/// Declarative side-effect request emitted by a transition. The engine never
/// executes these itself; the caller runs them through a dispatcher and must
/// guarantee at-least-once delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SideEffect {
    Notify(NotificationRequest),
    ScheduleCheck { case_id: CaseId, on: NaiveDate },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub case_id: CaseId,
    pub recipients: Vec<Recipient>,
    pub template: String,
    pub payload: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub role: PartyRole,
    pub contact: String,
}

impl Recipient {
    pub fn from_party(party: &Party) -> Self {
        Self {
            role: party.role,
            contact: party.email.clone(),
        }
    }
}

/// Outbound notification collaborator. Delivery transport is the host
/// application's concern.
pub trait Notifier: Send + Sync {
    fn notify(&self, request: &NotificationRequest) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
    #[error("notification collaborator timed out")]
    Timeout,
}

/// A side effect that could not be delivered and must be retried by the
/// caller. The originating state change stays authoritative either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingSideEffect {
    pub effect: SideEffect,
    pub reason: String,
}

/// Result of running a batch of side effects: undeliverable notifications
/// become retry records, schedule requests pass through untouched for the
/// host's job runner.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    pub pending_retry: Vec<PendingSideEffect>,
    pub schedule_requests: Vec<SideEffect>,
}

/// Executes notify requests against the collaborator, never dropping a
/// failure silently.
pub struct SideEffectDispatcher<'a, N: Notifier> {
    notifier: &'a N,
}

impl<'a, N: Notifier> SideEffectDispatcher<'a, N> {
    pub fn new(notifier: &'a N) -> Self {
        Self { notifier }
    }

    pub fn dispatch(&self, effects: Vec<SideEffect>) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        for effect in effects {
            match &effect {
                SideEffect::Notify(request) => {
                    if let Err(err) = self.notifier.notify(request) {
                        tracing::warn!(
                            case_id = %request.case_id.0,
                            template = %request.template,
                            error = %err,
                            "notification failed, recorded for retry"
                        );
                        outcome.pending_retry.push(PendingSideEffect {
                            effect,
                            reason: err.to_string(),
                        });
                    }
                }
                SideEffect::ScheduleCheck { .. } => outcome.schedule_requests.push(effect),
            }
        }
        outcome
    }
}
