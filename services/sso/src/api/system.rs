//! System/health API handlers.
//!
//! # Purpose and responsibility
//! Readiness endpoint for probes. Reports the storage backend in use and
//! answers 503 while it is unreachable.
//!
//! # Key invariants and assumptions
//! - Health checks must be fast and side-effect free.
use crate::api::error::{ApiError, api_unavailable};
use crate::api::types::{ErrorResponse, HealthStatus};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/v1/system/health",
    tag = "system",
    responses(
        (status = 200, description = "Service health", body = HealthStatus),
        (status = 503, description = "Storage unavailable", body = ErrorResponse)
    )
)]
pub(crate) async fn system_health(
    State(state): State<AppState>,
) -> Result<Json<HealthStatus>, ApiError> {
    if let Err(err) = state.store.health_check().await {
        tracing::warn!(backend = state.store.backend_name(), error = %err, "health check failed");
        return Err(api_unavailable("storage unavailable"));
    }
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
        backend: state.store.backend_name().to_string(),
    }))
}
