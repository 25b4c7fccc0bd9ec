//! API error types with JSON responses.
//!
//! Handlers classify outcomes by the tagged error kind, never by
//! inspecting message text. Every failure is terminal for its request
//! and surfaces as a `{"error": message}` body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use notably_store::StoreError;
use serde::Serialize;

/// API error that can be returned from handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Unauthorized (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Forbidden (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Uniqueness conflict (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unprocessable entity (422).
    #[error("unprocessable: {0}")]
    Unprocessable(String),

    /// Internal server error (500).
    #[error("internal error: {0}")]
    Internal(String),

    /// Store error, mapped to a status by its kind.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(e) => match e {
                StoreError::BlankUserId
                | StoreError::BlankNoteId
                | StoreError::BlankPasswordHash
                | StoreError::EmptyNote => StatusCode::BAD_REQUEST,
                StoreError::UserExists(_) => StatusCode::CONFLICT,
                StoreError::UserNotFound(_) | StoreError::NoteNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                StoreError::OwnerMismatch { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_status_mapping() {
        let cases = [
            (StoreError::BlankUserId, StatusCode::BAD_REQUEST),
            (StoreError::EmptyNote, StatusCode::BAD_REQUEST),
            (
                StoreError::UserExists("a@b.com".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                StoreError::UserNotFound("a@b.com".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                StoreError::NoteNotFound {
                    note_id: "n".to_string(),
                    user_id: "a@b.com".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                StoreError::OwnerMismatch {
                    note_id: "n".to_string(),
                    expected: "a".to_string(),
                    actual: "b".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::Store(err).status_code(), status);
        }
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorResponse {
            error: "bad request: something".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"bad request: something"}"#);
    }

    #[test]
    fn test_store_error_message_passes_through() {
        let err = ApiError::Store(StoreError::UserExists("a@b.com".to_string()));
        assert_eq!(err.to_string(), "user 'a@b.com' already exists");
    }
}
