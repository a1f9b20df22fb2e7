//! Legal case lifecycle: adjacency-table state machine, financial accrual,
//! deadline calculation, and risk/priority classification.

pub mod accrual;
pub mod classify;
pub mod deadlines;
pub mod domain;
pub mod effects;
pub mod repository;
pub mod service;
pub mod transitions;

#[cfg(test)]
mod tests;

pub use accrual::{compute_amounts, RecomputationError};
pub use classify::{classify, Classification};
pub use domain::{
    AuditEntry, CaseFinancials, CaseId, CaseIntake, CaseNumber, CasePhase, CasePriority,
    CaseResolution, CaseStatus, CaseType, ContractRef, CourtProceeding, DocumentKind,
    ExtrajudicialNotice, LegalCase, LegalDocument, NoticeMethod, Party, PartyRole, RiskLevel,
};
pub use effects::{
    DispatchOutcome, NotificationRequest, Notifier, NotifyError, PendingSideEffect, Recipient,
    SideEffect, SideEffectDispatcher,
};
pub use repository::{AllowAll, Authorizer, CaseRepository, RepositoryError};
pub use service::{CaseService, CaseServiceError, TransitionOutcome};
pub use transitions::TransitionError;
