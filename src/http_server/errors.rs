//! # Gateway API Errors
//!
//! One error taxonomy for the handler layer. Every variant maps to an HTTP
//! status and renders as the standard `{code, data, message}` envelope.
//! Backend-reported errors keep their original status instead of being
//! laundered into success responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::backend::BackendError;
use crate::storage::StorageError;

use super::response::Envelope;

/// Result type for handler operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client errors (4xx)
    // ==================
    /// Required parameter or body missing
    #[error("missing {0}")]
    MissingParam(&'static str),

    /// Table not in the allowed-table registry
    #[error("table not allowed: {0}")]
    TableNotAllowed(String),

    /// Unknown action segment
    #[error("invalid action: {0} (use get, insert, update, delete)")]
    InvalidAction(String),

    /// Malformed JSON on the merge or upload path
    #[error("{0}")]
    Parse(String),

    /// Merge source record missing
    #[error("record not found")]
    NotFound,

    // ==================
    // Upstream errors
    // ==================
    /// Backend answered with an error status; passed through
    #[error("{body}")]
    Backend { status: u16, body: String },

    /// Network failure reaching the backend; detail stays in the logs
    #[error("backend request failed")]
    Transport,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingParam(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidAction(_) => StatusCode::BAD_REQUEST,
            ApiError::Parse(_) => StatusCode::BAD_REQUEST,
            ApiError::TableNotAllowed(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Backend { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Transport => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotFound => ApiError::NotFound,
            BackendError::Parse(msg) => ApiError::Parse(msg),
            BackendError::Backend { status, body } => ApiError::Backend { status, body },
            BackendError::Transport(e) => {
                tracing::error!(error = %e, "backend transport failure");
                ApiError::Transport
            }
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Backend { status, body } => ApiError::Backend { status, body },
            StorageError::Transport(e) => {
                tracing::error!(error = %e, "storage transport failure");
                ApiError::Transport
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(Envelope::error(status.as_u16(), self.to_string()));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::MissingParam("body").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::TableNotAllowed("x".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Transport.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_backend_status_passthrough() {
        let err = ApiError::Backend {
            status: 409,
            body: "conflict".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let bogus = ApiError::Backend {
            status: 9999,
            body: String::new(),
        };
        assert_eq!(bogus.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_backend_error_conversion() {
        let err: ApiError = BackendError::NotFound.into();
        assert!(matches!(err, ApiError::NotFound));

        let err: ApiError = BackendError::Parse("bad".to_string()).into();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
