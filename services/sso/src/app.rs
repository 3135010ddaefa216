//! SSO HTTP application wiring.
//!
//! # Purpose
//! Builds the public and internal Axum routers, configures middleware, and
//! defines the shared application state injected into handlers.
//!
//! # Notes
//! Every route runs under a `TimeoutLayer`. When the deadline fires the
//! handler future is dropped, which abandons any in-flight store call.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::auth::AuthService;
use crate::observability;
use crate::store::IdentityStore;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub store: Arc<dyn IdentityStore>,
    pub request_timeout: Duration,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });
    let timeout = state.request_timeout;

    Router::new()
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route(
            "/v1/auth/register",
            axum::routing::post(api::auth::register),
        )
        .route("/v1/auth/login", axum::routing::post(api::auth::login))
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/v1/openapi.json", ApiDoc::openapi()),
        )
        .layer(TimeoutLayer::new(timeout))
        .layer(trace_layer)
        .with_state(state)
}

/// Routes for trusted callers only; served on a separate bind address.
pub fn build_internal_router(state: AppState) -> Router {
    let timeout = state.request_timeout;
    Router::new()
        .route(
            "/internal/v1/users/:user_id/is-admin",
            axum::routing::get(api::users::is_admin),
        )
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
