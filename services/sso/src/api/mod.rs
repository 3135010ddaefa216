//! SSO HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules and the request-scoped helpers they share.
pub mod auth;
pub mod error;
pub mod openapi;
pub mod system;
pub mod types;
pub mod users;

use axum::http::HeaderMap;

pub(crate) const REQUEST_ID_HEADER: &str = "x-request-id";

/// Echo the caller's request id, when present, into error bodies.
pub(crate) fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
