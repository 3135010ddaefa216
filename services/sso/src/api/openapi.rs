//! OpenAPI schema aggregation for the SSO API.
use crate::api::{
    auth, system,
    types::{
        ErrorResponse, HealthStatus, IsAdminResponse, LoginRequest, LoginResponse,
        RegisterRequest, RegisterResponse,
    },
    users,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "sso",
        version = "v1",
        description = "Single sign-on credential service HTTP API"
    ),
    paths(
        system::system_health,
        auth::register,
        auth::login,
        users::is_admin
    ),
    components(schemas(
        ErrorResponse,
        HealthStatus,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        IsAdminResponse
    )),
    tags(
        (name = "system", description = "Health endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Internal user queries")
    )
)]
pub struct ApiDoc;
