//! Typed error handling for the CRUD REST protocol
//!
//! The endpoint converts every failure into an HTTP status plus a JSON
//! `{code, message}` body. The message text for `NotFound` and `MalformedId`
//! is part of the wire contract: the client surfaces it verbatim so callers
//! can tell "no such entity" apart from "unparsable id", both of which travel
//! as HTTP 404.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Errors raised by the CRUD endpoint and its collaborators
#[derive(Debug, thiserror::Error)]
pub enum CrudError {
    /// No entity exists under the given, well-formed identifier
    #[error("No such entity with ID {id}")]
    NotFound { id: String },

    /// The path segment could not be parsed into the identifier type.
    /// Reported with the same 404 status as `NotFound` but a distinguishing
    /// message, mirroring how routers treat unroutable paths.
    #[error("Malformed ID: {id}")]
    MalformedId { id: String },

    /// A query parameter was out of range or unparsable
    #[error("Invalid parameter {name}: {message}")]
    InvalidParam { name: String, message: String },

    /// The entity failed its domain constraints
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The caller is not allowed to perform this operation
    #[error("Access denied")]
    AccessDenied,

    /// The backing store failed
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl CrudError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CrudError::NotFound { .. } => StatusCode::NOT_FOUND,
            CrudError::MalformedId { .. } => StatusCode::NOT_FOUND,
            CrudError::InvalidParam { .. } => StatusCode::BAD_REQUEST,
            CrudError::Validation(_) => StatusCode::BAD_REQUEST,
            CrudError::AccessDenied => StatusCode::FORBIDDEN,
            CrudError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CrudError::NotFound { .. } => "NOT_FOUND",
            CrudError::MalformedId { .. } => "MALFORMED_ID",
            CrudError::InvalidParam { .. } => "INVALID_PARAM",
            CrudError::Validation(_) => "VALIDATION_ERROR",
            CrudError::AccessDenied => "ACCESS_DENIED",
            CrudError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Convert to an error response body
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for CrudError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(self.to_response())).into_response()
    }
}
