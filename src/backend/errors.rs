//! Backend error types

use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors from the table backend
#[derive(Debug, Error)]
pub enum BackendError {
    /// Filter selected zero records (merge source missing)
    #[error("record not found")]
    NotFound,

    /// Malformed JSON on the merge path
    #[error("failed to parse data: {0}")]
    Parse(String),

    /// The backend answered with a non-success status
    #[error("backend returned status {status}")]
    Backend { status: u16, body: String },

    /// Network-level failure reaching the backend
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
