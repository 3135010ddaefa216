//! Registration and login handlers.
//!
//! # Purpose and responsibility
//! Validate field presence, call the credential service, and translate its
//! error kinds into HTTP responses.
//!
//! # Security considerations
//! - Passwords are never logged; request types redact them in `Debug`.
//! - Unknown email and wrong password share one 401 response.
use crate::api::error::{ApiError, api_invalid_argument};
use crate::api::request_id;
use crate::api::types::{
    ErrorResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};

#[utoipa::path(
    post,
    path = "/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Missing email or password", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let request_id = request_id(&headers);
    let Json(body) = body.map_err(|rejection| {
        api_invalid_argument(&rejection.body_text()).with_request_id(request_id.clone())
    })?;
    validate_credentials(&body.email, &body.password)
        .map_err(|err| err.with_request_id(request_id.clone()))?;

    let user_id = state
        .auth
        .register_new_user(&body.email, &body.password)
        .await
        .map_err(|err| ApiError::from(err).with_request_id(request_id))?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 400, description = "Missing email, password or app_id", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 404, description = "Unknown application", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let request_id = request_id(&headers);
    let Json(body) = body.map_err(|rejection| {
        api_invalid_argument(&rejection.body_text()).with_request_id(request_id.clone())
    })?;
    validate_credentials(&body.email, &body.password)
        .map_err(|err| err.with_request_id(request_id.clone()))?;
    if body.app_id == 0 {
        return Err(api_invalid_argument("app_id is required").with_request_id(request_id));
    }

    let token = state
        .auth
        .login(&body.email, &body.password, body.app_id)
        .await
        .map_err(|err| ApiError::from(err).with_request_id(request_id))?;
    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
    }))
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() {
        return Err(api_invalid_argument("email is required"));
    }
    if password.is_empty() {
        return Err(api_invalid_argument("password is required"));
    }
    Ok(())
}
