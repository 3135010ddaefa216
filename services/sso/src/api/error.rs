//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every SSO endpoint returns
//! the same `{code, message, request_id}` shape.
//!
//! # Key invariants and assumptions
//! - `code` is stable and machine-readable; `message` is for humans.
//! - Server faults (hashing, signing, storage) never leak details to the
//!   client. The cause is logged and a generic message is returned.
use crate::api::types::ErrorResponse;
use crate::auth::{AuthError, AuthErrorKind};
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::error::Error as _;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            body: ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
                request_id: None,
            },
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.body.request_id = request_id;
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Build a 400 Bad Request for missing or malformed input.
pub fn api_invalid_argument(message: &str) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, "invalid_argument", message)
}

/// Build a 503 for a backend that failed its health probe.
pub fn api_unavailable(message: &str) -> ApiError {
    ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "unavailable", message)
}

pub fn api_internal_message(message: &str) -> ApiError {
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let kind = err.kind();
        match kind {
            AuthErrorKind::InvalidCredentials => {
                ApiError::new(StatusCode::UNAUTHORIZED, kind.as_str(), "invalid email or password")
            }
            AuthErrorKind::UserAlreadyExists => {
                ApiError::new(StatusCode::CONFLICT, kind.as_str(), "user already exists")
            }
            AuthErrorKind::UserNotFound => {
                ApiError::new(StatusCode::NOT_FOUND, kind.as_str(), "user not found")
            }
            AuthErrorKind::AppNotFound => {
                ApiError::new(StatusCode::NOT_FOUND, kind.as_str(), "app not found")
            }
            AuthErrorKind::HashingFailed
            | AuthErrorKind::TokenSigningFailed
            | AuthErrorKind::Internal => {
                tracing::error!(
                    op = err.op(),
                    kind = kind.as_str(),
                    cause = ?err.source(),
                    "request failed"
                );
                api_internal_message("internal error")
            }
        }
    }
}
