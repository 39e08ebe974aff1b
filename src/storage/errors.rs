//! Storage error types

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors from the object-store API
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage API answered with a non-success status
    #[error("storage returned status {status}: {body}")]
    Backend { status: u16, body: String },

    /// Network-level failure reaching the storage API
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
