use axum::{http::StatusCode, response::IntoResponse, response::Response, Extension, Json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::AuthFlow;

use super::types::{ApiResponse, LoginRequest, SessionResponse};
use super::utils::{bad_request, error_response, valid_email};

/// Authenticate a verified account and open a session.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, tokens issued", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Missing or invalid payload", body = ApiResponse<String>),
        (status = 401, description = "Invalid credentials or email not verified", body = ApiResponse<String>),
        (status = 500, description = "Unexpected error", body = ApiResponse<String>)
    ),
    tag = "auth"
)]
pub async fn login(
    Extension(flow): Extension<Arc<AuthFlow>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return bad_request("Missing payload");
    };

    if !valid_email(&request.email) {
        return bad_request("Invalid email format");
    }
    if request.password.is_empty() {
        return bad_request("Password is required");
    }

    match flow.login(&request.email, &request.password).await {
        Ok(session) => {
            info!("Login succeeded");
            (
                StatusCode::OK,
                Json(ApiResponse::ok(
                    "Login successful",
                    SessionResponse::from(session),
                )),
            )
                .into_response()
        }
        Err(err) => {
            warn!("Login failed: {err}");
            error_response(&err)
        }
    }
}
