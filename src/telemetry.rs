//! Tracing setup for hosts that do not install their own subscriber.
//!
//! The engine itself only emits through `tracing`; embedding applications
//! that already have a subscriber can skip `init` entirely.

use std::fmt;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug)]
pub enum TelemetryError {
    InvalidFilter { value: String, source: ParseError },
    AlreadyInstalled(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidFilter { value, .. } => {
                write!(f, "log filter '{value}' does not parse")
            }
            TelemetryError::AlreadyInstalled(err) => {
                write!(f, "unable to install tracing subscriber: {err}")
            }
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidFilter { source, .. } => Some(source),
            TelemetryError::AlreadyInstalled(err) => Some(&**err),
        }
    }
}

/// Builds the engine's log filter. `RUST_LOG` wins when set; otherwise the
/// configured level applies across the crate.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::InvalidFilter {
        value: config.log_level.clone(),
        source,
    })
}

/// Installs a compact, ANSI-free subscriber suitable for the batch hosts
/// that run the escalation sweep.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(config)?)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: level.to_string(),
        }
    }

    #[test]
    fn configured_level_backs_the_filter() {
        std::env::remove_var("RUST_LOG");
        assert!(build_filter(&config("rental_legal=debug")).is_ok());
    }

    #[test]
    fn malformed_level_is_rejected() {
        std::env::remove_var("RUST_LOG");
        match build_filter(&config("cases=notalevel")) {
            Err(TelemetryError::InvalidFilter { value, .. }) => {
                assert_eq!(value, "cases=notalevel")
            }
            other => panic!("expected invalid filter error, got {other:?}"),
        }
    }
}
