// src/error.rs
// Error types for DCI client and service calls

use thiserror::Error;

/// Main error type for the dci-mcp library
#[derive(Error, Debug)]
pub enum DciError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("DCI API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Result using DciError
pub type Result<T> = std::result::Result<T, DciError>;

impl DciError {
    /// True when the control server answered 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, DciError::Status { status: 404, .. })
    }
}
