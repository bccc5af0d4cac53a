//! Error types for shiftcal.

use thiserror::Error;

/// Errors that can occur in shiftcal operations.
#[derive(Error, Debug)]
pub enum ShiftCalError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Weather error: {0}")]
    Weather(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ShiftCalError {
    fn from(e: serde_json::Error) -> Self {
        ShiftCalError::Serialization(e.to_string())
    }
}

/// Result type alias for shiftcal operations.
pub type ShiftCalResult<T> = Result<T, ShiftCalError>;
