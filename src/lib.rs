//! Legal case and dispute lifecycle engine for property rental management.
//!
//! The engine is a library, not a server: it tracks non-payment, damage, and
//! breach disputes from first default through mediation, extrajudicial
//! notice, court filing, judgment, and closure, accruing interest and fees,
//! computing deadlines, and classifying risk along the way. Persistence,
//! notification delivery, and authorization are collaborator traits the host
//! application provides.

pub mod cases;
pub mod config;
pub mod disputes;
pub mod error;
pub mod scheduler;
pub mod telemetry;

pub use error::EngineError;
