use utoipa::OpenApi;

use super::handlers::auth::{
    login::{__path_login, login},
    register::{__path_register, register},
    resend::{__path_resend_code, resend_code},
    types::{
        AccountResponse, ApiResponse, LoginRequest, RegisterRequest, ResendCodeRequest,
        SessionResponse, VerifyEmailRequest,
    },
    verify::{__path_verify_email, verify_email},
};
use super::handlers::health::{__path_health, health, Health};

#[derive(OpenApi)]
#[openapi(
    paths(health, register, verify_email, resend_code, login),
    components(schemas(
        Health,
        RegisterRequest,
        VerifyEmailRequest,
        ResendCodeRequest,
        LoginRequest,
        AccountResponse,
        SessionResponse,
        ApiResponse<SessionResponse>,
        ApiResponse<String>,
    )),
    tags(
        (name = "auth", description = "Registration, email verification and login"),
        (name = "health", description = "Service and database health")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
