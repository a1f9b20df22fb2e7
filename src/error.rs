use crate::cases::service::CaseServiceError;
use crate::config::ConfigError;
use crate::disputes::DisputeError;
use crate::scheduler::SweepFatalError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Top-level error for host applications embedding the engine.
#[derive(Debug)]
pub enum EngineError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Case(CaseServiceError),
    Dispute(DisputeError),
    Sweep(SweepFatalError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Config(err) => write!(f, "configuration error: {}", err),
            EngineError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            EngineError::Case(err) => write!(f, "case error: {}", err),
            EngineError::Dispute(err) => write!(f, "dispute error: {}", err),
            EngineError::Sweep(err) => write!(f, "sweep error: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Config(err) => Some(err),
            EngineError::Telemetry(err) => Some(err),
            EngineError::Case(err) => Some(err),
            EngineError::Dispute(err) => Some(err),
            EngineError::Sweep(err) => Some(err),
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for EngineError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<CaseServiceError> for EngineError {
    fn from(value: CaseServiceError) -> Self {
        Self::Case(value)
    }
}

impl From<DisputeError> for EngineError {
    fn from(value: DisputeError) -> Self {
        Self::Dispute(value)
    }
}

impl From<SweepFatalError> for EngineError {
    fn from(value: SweepFatalError) -> Self {
        Self::Sweep(value)
    }
}
