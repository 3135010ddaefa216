//! Internal user queries.
//!
//! # Purpose
//! Serves the admin-flag lookup to trusted callers on the internal router.
//! Unlike login, an unknown user id is reported as 404 rather than hidden.
use crate::api::error::{ApiError, api_invalid_argument};
use crate::api::request_id;
use crate::api::types::{ErrorResponse, IsAdminResponse};
use crate::app::AppState;
use crate::model::UserId;
use axum::Json;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;

#[utoipa::path(
    get,
    path = "/internal/v1/users/{user_id}/is-admin",
    tag = "users",
    params(("user_id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Admin flag", body = IsAdminResponse),
        (status = 400, description = "Missing or malformed user id", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub(crate) async fn is_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<Json<IsAdminResponse>, ApiError> {
    let request_id = request_id(&headers);
    let user_id = match user_id {
        Ok(Path(0)) => {
            return Err(api_invalid_argument("user_id is required").with_request_id(request_id));
        }
        Ok(Path(user_id)) => user_id,
        Err(rejection) => {
            return Err(api_invalid_argument(&rejection.body_text()).with_request_id(request_id));
        }
    };

    let is_admin = state
        .auth
        .is_admin(user_id)
        .await
        .map_err(|err| ApiError::from(err).with_request_id(request_id))?;
    Ok(Json(IsAdminResponse { is_admin }))
}
