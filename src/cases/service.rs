use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use super::accrual::{self, RecomputationError};
use super::classify;
use super::deadlines;
use super::domain::{
    CaseFinancials, CaseId, CaseIntake, CaseNumber, CasePhase, CasePriority, CaseResolution,
    CaseStatus, CourtProceeding, ExtrajudicialNotice, LegalCase, LegalDocument, PartyRole,
    RiskLevel,
};
use super::effects::{NotificationRequest, Recipient, SideEffect};
use super::repository::{Authorizer, CaseRepository, RepositoryError};
use super::transitions::{self, TransitionError};
use crate::config::EngineConfig;

static CASE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_case_identity() -> (CaseId, CaseNumber) {
    let seq = CASE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    (
        CaseId(format!("case-{seq:06}")),
        CaseNumber(format!("LC-{seq:06}")),
    )
}

/// A state change plus the side-effect requests the caller must execute.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub case: LegalCase,
    pub side_effects: Vec<SideEffect>,
}

/// Service composing the transition table, accrual engine, classifier, and
/// deadline calculator over a repository and an authorization collaborator.
///
/// Mutations go through optimistic versioning: the loaded version is passed
/// to `save`, so of two concurrent updates to the same case exactly one
/// succeeds and the other observes `RepositoryError::StaleVersion`.
pub struct CaseService<R, A> {
    repository: Arc<R>,
    authorizer: Arc<A>,
    config: EngineConfig,
}

impl<R, A> CaseService<R, A>
where
    R: CaseRepository + 'static,
    A: Authorizer + 'static,
{
    pub fn new(repository: Arc<R>, authorizer: Arc<A>, config: EngineConfig) -> Self {
        Self {
            repository,
            authorizer,
            config,
        }
    }

    /// Opens a case for a contract in default. The case starts pre-judicial
    /// with a computed deadline, derived classification, and an opening audit
    /// entry.
    pub fn open_case(
        &self,
        intake: CaseIntake,
        today: NaiveDate,
    ) -> Result<TransitionOutcome, CaseServiceError> {
        if intake.total_debt < 0 {
            return Err(RecomputationError::InconsistentSnapshot("total debt is negative").into());
        }

        let (id, case_number) = next_case_identity();
        let mut case = LegalCase {
            id,
            case_number,
            case_type: intake.case_type,
            status: CaseStatus::PreJudicial,
            current_phase: CasePhase::PreJudicial,
            priority: CasePriority::Low,
            risk_level: RiskLevel::Low,
            financials: CaseFinancials::opening(intake.total_debt),
            settlement_offer: None,
            first_default_date: intake.first_default_date,
            opened_on: today,
            updated_on: today,
            next_deadline: None,
            court_date: None,
            contract: intake.contract,
            notices: Vec::new(),
            documents: Vec::new(),
            proceedings: Vec::new(),
            audit_trail: Vec::new(),
            assigned_lawyer: intake.assigned_lawyer,
            phases_entered: BTreeSet::from([CasePhase::PreJudicial]),
            missed_deadlines: 0,
            last_escalated_deadline: None,
            archived: false,
            version: 1,
        };

        case.record_audit(
            today,
            "system",
            "case_opened",
            None,
            Some(CaseStatus::PreJudicial),
            intake.notes,
        );
        self.refresh(&mut case, today)?;

        let stored = self.repository.insert(case)?;
        tracing::info!(
            case_number = %stored.case_number.0,
            case_type = stored.case_type.label(),
            "legal case opened"
        );

        let mut side_effects = self.side_effects_for(&stored, "legal_case_opened");
        if let Some(deadline) = stored.next_deadline {
            side_effects.push(SideEffect::ScheduleCheck {
                case_id: stored.id.clone(),
                on: deadline,
            });
        }

        Ok(TransitionOutcome {
            case: stored,
            side_effects,
        })
    }

    /// Moves a case along the adjacency table. On failure the stored record
    /// is left untouched; there is no partial mutation.
    pub fn transition(
        &self,
        id: &CaseId,
        target: CaseStatus,
        actor: &str,
        notes: Option<String>,
        today: NaiveDate,
    ) -> Result<TransitionOutcome, CaseServiceError> {
        let case = self.load(id)?;
        self.authorize(actor, "transition", &case)?;
        transitions::validate(&case, target)?;

        let expected_version = case.version;
        let from = case.status;
        let mut updated = case;
        updated.status = target;
        updated.current_phase = transitions::phase_for(target);
        updated.phases_entered.insert(updated.current_phase);
        updated.record_audit(today, actor, "status_transition", Some(from), Some(target), notes);
        self.refresh(&mut updated, today)?;
        updated.updated_on = today;
        updated.version += 1;

        self.repository.save(updated.clone(), expected_version)?;
        tracing::info!(
            case_number = %updated.case_number.0,
            from = from.label(),
            to = target.label(),
            actor,
            "case transitioned"
        );

        let mut side_effects = self.side_effects_for(&updated, "case_status_changed");
        if let Some(deadline) = updated.next_deadline {
            side_effects.push(SideEffect::ScheduleCheck {
                case_id: updated.id.clone(),
                on: deadline,
            });
        }

        Ok(TransitionOutcome {
            case: updated,
            side_effects,
        })
    }

    /// Closes a case from any non-terminal state, freezing the financial
    /// fields at their current computed value as the final amount.
    pub fn resolve(
        &self,
        id: &CaseId,
        resolution: CaseResolution,
        notes: Option<String>,
        resolved_by: &str,
        today: NaiveDate,
    ) -> Result<TransitionOutcome, CaseServiceError> {
        let case = self.load(id)?;
        self.authorize(resolved_by, "resolve", &case)?;

        let target = match resolution {
            CaseResolution::Settlement => CaseStatus::SettlementReached,
            CaseResolution::Dismissed => CaseStatus::Dismissed,
            CaseResolution::Judgment | CaseResolution::Withdrawn | CaseResolution::Other => {
                CaseStatus::CaseClosed
            }
        };
        if case.is_terminal() {
            return Err(TransitionError::InvalidTransition {
                from: case.status,
                to: target,
            }
            .into());
        }

        let expected_version = case.version;
        let from = case.status;
        let mut updated = case;
        // Final amounts are computed as of the resolution date, then frozen.
        updated.financials = accrual::compute_amounts(&updated, today, &self.config.accrual)?;
        updated.status = target;
        updated.current_phase = CasePhase::Closed;
        updated.next_deadline = None;
        updated.record_audit(
            today,
            resolved_by,
            &format!("case_resolved_{}", resolution.label().to_lowercase()),
            Some(from),
            Some(target),
            notes,
        );
        updated.updated_on = today;
        updated.version += 1;

        self.repository.save(updated.clone(), expected_version)?;
        tracing::info!(
            case_number = %updated.case_number.0,
            resolution = resolution.label(),
            final_amount = updated.financials.total_amount,
            "case resolved"
        );

        let side_effects = self.side_effects_for(&updated, "case_resolved");
        Ok(TransitionOutcome {
            case: updated,
            side_effects,
        })
    }

    /// Marks a terminal case read-only and removes it from active
    /// scheduling. Idempotent: archiving an archived case is a no-op.
    pub fn archive(&self, id: &CaseId, today: NaiveDate) -> Result<LegalCase, CaseServiceError> {
        let case = self.load(id)?;
        if !case.is_terminal() {
            return Err(CaseServiceError::NotTerminal {
                status: case.status,
            });
        }
        if case.archived {
            return Ok(case);
        }

        let expected_version = case.version;
        let mut updated = case;
        updated.archived = true;
        updated.record_audit(today, "system", "case_archived", None, None, None);
        updated.updated_on = today;
        updated.version += 1;
        self.repository.save(updated.clone(), expected_version)?;
        Ok(updated)
    }

    /// Records an extrajudicial notice against the case. Not a state-machine
    /// transition, but still versioned and audited.
    pub fn record_notice(
        &self,
        id: &CaseId,
        notice: ExtrajudicialNotice,
        actor: &str,
        today: NaiveDate,
    ) -> Result<LegalCase, CaseServiceError> {
        self.amend(id, actor, "notice_recorded", today, move |case| {
            case.notices.push(notice);
        })
    }

    /// Attaches a legal document (demand, evidence, court order, ...).
    pub fn attach_document(
        &self,
        id: &CaseId,
        document: LegalDocument,
        actor: &str,
        today: NaiveDate,
    ) -> Result<LegalCase, CaseServiceError> {
        self.amend(id, actor, "document_attached", today, move |case| {
            case.documents.push(document);
        })
    }

    /// Registers a court proceeding and sets the hearing date used by the
    /// deadline calculator and the HearingScheduled precondition.
    pub fn schedule_hearing(
        &self,
        id: &CaseId,
        proceeding: CourtProceeding,
        actor: &str,
        today: NaiveDate,
    ) -> Result<LegalCase, CaseServiceError> {
        self.amend(id, actor, "hearing_scheduled", today, move |case| {
            case.court_date = Some(proceeding.scheduled_for);
            case.proceedings.push(proceeding);
        })
    }

    /// Records a settlement offer on an open case.
    pub fn record_settlement_offer(
        &self,
        id: &CaseId,
        amount: i64,
        actor: &str,
        today: NaiveDate,
    ) -> Result<LegalCase, CaseServiceError> {
        self.amend(id, actor, "settlement_offer_recorded", today, move |case| {
            case.settlement_offer = Some(amount);
        })
    }

    /// Recomputes derived financials, classification, and the next deadline
    /// for the current status. Financial fields may change without a state
    /// change; the stored figures are never authoritative.
    fn refresh(&self, case: &mut LegalCase, today: NaiveDate) -> Result<(), CaseServiceError> {
        case.financials = accrual::compute_amounts(case, today, &self.config.accrual)?;
        let classification = classify::classify(case, today, &self.config.classifier);
        case.priority = classification.priority;
        case.risk_level = classification.risk_level;
        case.next_deadline = deadlines::next_deadline(case, today, &self.config.deadlines);
        Ok(())
    }

    fn amend<F>(
        &self,
        id: &CaseId,
        actor: &str,
        action: &str,
        today: NaiveDate,
        apply: F,
    ) -> Result<LegalCase, CaseServiceError>
    where
        F: FnOnce(&mut LegalCase),
    {
        let case = self.load(id)?;
        self.authorize(actor, action, &case)?;
        if case.is_terminal() {
            return Err(TransitionError::InvalidTransition {
                from: case.status,
                to: case.status,
            }
            .into());
        }

        let expected_version = case.version;
        let mut updated = case;
        apply(&mut updated);
        updated.record_audit(today, actor, action, None, None, None);
        self.refresh(&mut updated, today)?;
        updated.updated_on = today;
        updated.version += 1;
        self.repository.save(updated.clone(), expected_version)?;
        Ok(updated)
    }

    fn load(&self, id: &CaseId) -> Result<LegalCase, CaseServiceError> {
        let case = self
            .repository
            .load(id)?
            .ok_or(RepositoryError::NotFound)?;
        if !case.financials.is_consistent() {
            return Err(CaseServiceError::CorruptRecord {
                case_id: case.id.clone(),
            });
        }
        Ok(case)
    }

    fn authorize(
        &self,
        actor: &str,
        action: &str,
        case: &LegalCase,
    ) -> Result<(), CaseServiceError> {
        if self.authorizer.can_perform(actor, action, case) {
            Ok(())
        } else {
            Err(TransitionError::Unauthorized {
                actor: actor.to_owned(),
                action: action.to_owned(),
            }
            .into())
        }
    }

    fn side_effects_for(&self, case: &LegalCase, template: &str) -> Vec<SideEffect> {
        let mut recipients = vec![
            Recipient::from_party(&case.contract.tenant),
            Recipient::from_party(&case.contract.owner),
        ];
        if let Some(broker) = &case.contract.broker {
            recipients.push(Recipient::from_party(broker));
        }
        if let Some(lawyer) = &case.assigned_lawyer {
            recipients.push(Recipient {
                role: PartyRole::Lawyer,
                contact: lawyer.clone(),
            });
        }

        vec![SideEffect::Notify(NotificationRequest {
            case_id: case.id.clone(),
            recipients,
            template: template.to_owned(),
            payload: json!({
                "case_number": case.case_number.0,
                "status": case.status.label(),
                "phase": case.current_phase.label(),
                "total_amount": case.financials.total_amount,
                "next_deadline": case.next_deadline,
            }),
        })]
    }
}

/// Error raised by the case service. Expected domain conditions are typed;
/// only a corrupt persisted record is unrecoverable.
#[derive(Debug, thiserror::Error)]
pub enum CaseServiceError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Recomputation(#[from] RecomputationError),
    #[error("case must be terminal before archiving, status is {}", status.label())]
    NotTerminal { status: CaseStatus },
    #[error("persisted record for case {} violates financial invariants", case_id.0)]
    CorruptRecord { case_id: CaseId },
}
