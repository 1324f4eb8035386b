//! Core error types for Cadenza

use thiserror::Error;

/// Main error type for Cadenza operations
#[derive(Error, Debug)]
pub enum CadenzaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Quota exceeded while writing {key} ({requested} bytes)")]
    QuotaExceeded { key: String, requested: u64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for Cadenza operations
pub type CadenzaResult<T> = Result<T, CadenzaError>;

impl From<serde_json::Error> for CadenzaError {
    fn from(err: serde_json::Error) -> Self {
        CadenzaError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for CadenzaError {
    fn from(err: anyhow::Error) -> Self {
        CadenzaError::Other(err.to_string())
    }
}
