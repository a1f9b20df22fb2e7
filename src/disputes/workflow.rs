use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;

use super::domain::{
    resolution_options_for, Dispute, DisputeId, DisputeNumber, DisputeStatus, DisputeType,
    MediationStatus, ResolutionOption,
};
use crate::cases::domain::{ContractRef, PartyRole};

static DISPUTE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_dispute_identity() -> (DisputeId, DisputeNumber) {
    let seq = DISPUTE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    (
        DisputeId(format!("dispute-{seq:06}")),
        DisputeNumber(format!("DSP-{seq:06}")),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisputeError {
    #[error("resolution option {} is not available for this dispute", requested.label())]
    InvalidResolutionOption {
        requested: ResolutionOption,
        allowed: Vec<ResolutionOption>,
    },
    #[error("dispute is already closed")]
    DisputeAlreadyClosed,
    #[error("dispute transition from {} to {} is not allowed", from.label(), to.label())]
    InvalidTransition {
        from: DisputeStatus,
        to: DisputeStatus,
    },
    #[error("disputes can only be assigned while open or pending")]
    AssignmentNotAllowed,
    #[error("mediation can only start while the dispute is open")]
    MediationUnavailable,
}

impl Dispute {
    /// Opens a dispute; the resolution allow-list is fixed here from the
    /// dispute type and never widened afterwards.
    pub fn open(
        dispute_type: DisputeType,
        contract: ContractRef,
        initiated_by: PartyRole,
        amount: i64,
        description: String,
        today: NaiveDate,
    ) -> Self {
        let (id, dispute_number) = next_dispute_identity();
        Self {
            id,
            dispute_number,
            dispute_type,
            status: DisputeStatus::Open,
            mediation_status: MediationStatus::Available,
            amount,
            description,
            initiated_by,
            contract,
            resolution_options: resolution_options_for(dispute_type),
            resolution: None,
            resolved_by: None,
            resolved_on: None,
            assigned_to: None,
            mediation_plan: None,
            opened_on: today,
            updated_on: today,
            version: 1,
        }
    }

    /// Assigns a support agent. Legal only while Open or Pending; the status
    /// itself does not change.
    pub fn assign(&mut self, agent: &str, today: NaiveDate) -> Result<(), DisputeError> {
        if self.is_terminal() {
            return Err(DisputeError::DisputeAlreadyClosed);
        }
        if !matches!(self.status, DisputeStatus::Open | DisputeStatus::Pending) {
            return Err(DisputeError::AssignmentNotAllowed);
        }
        self.assigned_to = Some(agent.to_owned());
        self.touch(today);
        Ok(())
    }

    /// Forward-only status progression (Open → Pending → InProgress).
    /// Terminal outcomes are reached through `resolve` or `cancel` only.
    pub fn advance(&mut self, target: DisputeStatus, today: NaiveDate) -> Result<(), DisputeError> {
        if self.is_terminal() {
            return Err(DisputeError::DisputeAlreadyClosed);
        }
        let forward = matches!(
            (self.status, target),
            (DisputeStatus::Open, DisputeStatus::Pending)
                | (DisputeStatus::Open, DisputeStatus::InProgress)
                | (DisputeStatus::Pending, DisputeStatus::InProgress)
        );
        if !forward {
            return Err(DisputeError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.touch(today);
        Ok(())
    }

    /// Starts mediation. Legal only while the dispute is Open; moves the
    /// mediation sub-state without touching the dispute status.
    pub fn start_mediation(&mut self, plan: &str, today: NaiveDate) -> Result<(), DisputeError> {
        if self.is_terminal() {
            return Err(DisputeError::DisputeAlreadyClosed);
        }
        if self.status != DisputeStatus::Open || self.mediation_status != MediationStatus::Available
        {
            return Err(DisputeError::MediationUnavailable);
        }
        self.mediation_status = MediationStatus::InProgress;
        self.mediation_plan = Some(plan.to_owned());
        self.touch(today);
        Ok(())
    }

    /// Resolves the dispute with one of its allowed resolution kinds.
    pub fn resolve(
        &mut self,
        option: ResolutionOption,
        notes: &str,
        resolved_by: &str,
        today: NaiveDate,
    ) -> Result<(), DisputeError> {
        if self.is_terminal() {
            return Err(DisputeError::DisputeAlreadyClosed);
        }
        if !self.resolution_options.contains(&option) {
            return Err(DisputeError::InvalidResolutionOption {
                requested: option,
                allowed: self.resolution_options.clone(),
            });
        }
        self.status = DisputeStatus::Resolved;
        self.mediation_status = MediationStatus::Completed;
        self.resolution = Some(format!("{}: {notes}", option.label()));
        self.resolved_by = Some(resolved_by.to_owned());
        self.resolved_on = Some(today);
        self.touch(today);
        tracing::info!(
            dispute_number = %self.dispute_number.0,
            option = option.label(),
            "dispute resolved"
        );
        Ok(())
    }

    /// Cancels the dispute; terminal, like resolution.
    pub fn cancel(&mut self, reason: &str, today: NaiveDate) -> Result<(), DisputeError> {
        if self.is_terminal() {
            return Err(DisputeError::DisputeAlreadyClosed);
        }
        self.status = DisputeStatus::Cancelled;
        self.resolution = Some(format!("Cancelled: {reason}"));
        self.resolved_on = Some(today);
        self.touch(today);
        Ok(())
    }

    fn touch(&mut self, today: NaiveDate) {
        self.updated_on = today;
        self.version += 1;
    }
}
