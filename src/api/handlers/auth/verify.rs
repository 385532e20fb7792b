use axum::{http::StatusCode, response::IntoResponse, response::Response, Extension, Json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::AuthFlow;

use super::types::{ApiResponse, SessionResponse, VerifyEmailRequest};
use super::utils::{bad_request, error_response, valid_code, valid_email};

/// Consume a verification code, mark the account verified and open a session.
#[utoipa::path(
    post,
    path = "/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified, tokens issued", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Missing payload, invalid, used or expired code", body = ApiResponse<String>),
        (status = 404, description = "Account not found", body = ApiResponse<String>),
        (status = 500, description = "Unexpected error", body = ApiResponse<String>)
    ),
    tag = "auth"
)]
pub async fn verify_email(
    Extension(flow): Extension<Arc<AuthFlow>>,
    payload: Option<Json<VerifyEmailRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return bad_request("Missing payload");
    };

    if !valid_email(&request.email) {
        return bad_request("Invalid email format");
    }
    if !valid_code(&request.code) {
        return bad_request("Verification code must be 6 digits");
    }

    match flow.verify_email(&request.email, &request.code).await {
        Ok(session) => {
            info!("Email verified");
            (
                StatusCode::OK,
                Json(ApiResponse::ok(
                    "Email verified successfully",
                    SessionResponse::from(session),
                )),
            )
                .into_response()
        }
        Err(err) => {
            warn!("Email verification failed: {err}");
            error_response(&err)
        }
    }
}
