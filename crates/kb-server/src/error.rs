//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kb_storage::{StorageError, StorageErrorKind};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No asset or data file at the given path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request body is not a navigator event.
    #[error("Invalid event: {0}")]
    BadEvent(String),

    /// The viewer could not start because metadata failed to load.
    #[error("{0}")]
    MetadataUnavailable(String),

    /// Data file could not be read.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadEvent(_) => StatusCode::BAD_REQUEST,
            Self::Storage(e) if matches!(e.kind, StorageErrorKind::NotFound | StorageErrorKind::InvalidPath) => {
                StatusCode::NOT_FOUND
            }
            Self::MetadataUnavailable(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, axum::Json(json!({"error": self.to_string()}))).into_response()
    }
}
