use axum::{http::StatusCode, response::IntoResponse, response::Response, Extension, Json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::AuthFlow;

use super::types::{ApiResponse, ResendCodeRequest};
use super::utils::{bad_request, error_response, valid_email};

/// Issue a fresh verification code, subject to the resend cooldown.
#[utoipa::path(
    post,
    path = "/auth/resend-code",
    request_body = ResendCodeRequest,
    responses(
        (status = 200, description = "New verification code sent", body = ApiResponse<String>),
        (status = 400, description = "Missing payload or already verified", body = ApiResponse<String>),
        (status = 404, description = "Account not found", body = ApiResponse<String>),
        (status = 429, description = "Resend cooldown active", body = ApiResponse<String>),
        (status = 500, description = "Unexpected error", body = ApiResponse<String>)
    ),
    tag = "auth"
)]
pub async fn resend_code(
    Extension(flow): Extension<Arc<AuthFlow>>,
    payload: Option<Json<ResendCodeRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return bad_request("Missing payload");
    };

    if !valid_email(&request.email) {
        return bad_request("Invalid email format");
    }

    match flow.resend_code(&request.email).await {
        Ok(message) => {
            info!("Verification code resent");
            (
                StatusCode::OK,
                Json(ApiResponse::ok("Verification code sent", message)),
            )
                .into_response()
        }
        Err(err) => {
            warn!("Resend code failed: {err}");
            error_response(&err)
        }
    }
}
