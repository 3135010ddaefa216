//! HTTP API request/response types.
//!
//! # Purpose
//! Defines the JSON payloads of the SSO REST API and their OpenAPI schemas.
use crate::model::{AppId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
    pub backend: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

// Manual Debug on the request types keeps passwords out of logs.

#[derive(Serialize, Deserialize, ToSchema, Clone)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RegisterResponse {
    pub user_id: UserId,
}

#[derive(Serialize, Deserialize, ToSchema, Clone)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub app_id: AppId,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("app_id", &self.app_id)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct IsAdminResponse {
    pub is_admin: bool,
}
