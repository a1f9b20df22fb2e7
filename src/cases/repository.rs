use super::domain::{CaseId, LegalCase};

/// Storage abstraction over the relational store. Optimistic versioning is
/// mandatory: `save` must reject a write whose `expected_version` no longer
/// matches the stored record.
pub trait CaseRepository: Send + Sync {
    fn insert(&self, case: LegalCase) -> Result<LegalCase, RepositoryError>;
    fn load(&self, id: &CaseId) -> Result<Option<LegalCase>, RepositoryError>;
    fn save(&self, case: LegalCase, expected_version: u64) -> Result<(), RepositoryError>;
    /// Every non-archived, non-terminal case, for the escalation sweep.
    fn list_active(&self) -> Result<Vec<LegalCase>, RepositoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("case record already exists")]
    Conflict,
    #[error("case record not found")]
    NotFound,
    #[error("stale case version: expected {expected}, stored {stored}")]
    StaleVersion { expected: u64, stored: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// External authorization collaborator consulted before any transition.
pub trait Authorizer: Send + Sync {
    fn can_perform(&self, actor: &str, action: &str, case: &LegalCase) -> bool;
}

/// Permit-all authorizer for hosts that enforce access upstream.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn can_perform(&self, _actor: &str, _action: &str, _case: &LegalCase) -> bool {
        true
    }
}
