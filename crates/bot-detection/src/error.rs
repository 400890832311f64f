//! Bot Detection Error Types

use thiserror::Error;

/// Errors raised while configuring bot detection
#[derive(Debug, Error)]
pub enum DetectionError {
    /// Detection criteria could not be read or deserialized
    #[error("Detection criteria error: {0}")]
    Config(#[from] config::ConfigError),
}
