//! Content Analytics Error Types

use thiserror::Error;

/// Errors raised by ranking configuration and exports
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Ranking weights could not be read or deserialized
    #[error("Ranking configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Export could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Ranking method name not recognized
    #[error("Unknown ranking method: {0}")]
    UnknownMethod(String),
}
