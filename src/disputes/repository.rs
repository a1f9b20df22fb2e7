use super::domain::{Dispute, DisputeId};
use crate::cases::repository::RepositoryError;

/// Storage abstraction for disputes; mirrors the case repository, with the
/// same optimistic-versioning contract.
pub trait DisputeRepository: Send + Sync {
    fn insert(&self, dispute: Dispute) -> Result<Dispute, RepositoryError>;
    fn load(&self, id: &DisputeId) -> Result<Option<Dispute>, RepositoryError>;
    fn save(&self, dispute: Dispute, expected_version: u64) -> Result<(), RepositoryError>;
    fn list_open(&self) -> Result<Vec<Dispute>, RepositoryError>;
}
