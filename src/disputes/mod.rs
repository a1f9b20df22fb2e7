//! Non-judicial dispute resolution: a lighter forward-only workflow with an
//! orthogonal mediation sub-state.

pub mod domain;
pub mod repository;
mod workflow;


pub use domain::{
    resolution_options_for, Dispute, DisputeId, DisputeNumber, DisputeStatus, DisputeType,
    MediationStatus, ResolutionOption,
};
pub use repository::DisputeRepository;
pub use workflow::DisputeError;
