//! Alerting Error Types

use thiserror::Error;

/// Errors raised while configuring the alert engine
#[derive(Debug, Error)]
pub enum AlertError {
    /// Threshold configuration could not be read or deserialized
    #[error("Threshold configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Metric name does not map to a known alert type
    #[error("Unknown alert type: {0}")]
    UnknownType(String),
}
