use axum::{http::StatusCode, response::IntoResponse, response::Response, Extension, Json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::auth::AuthFlow;

use super::types::{ApiResponse, RegisterRequest};
use super::utils::{bad_request, error_response, valid_email, valid_name, valid_password};

/// Create an account and send the first verification code.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, verification pending", body = ApiResponse<String>),
        (status = 400, description = "Missing or invalid payload", body = ApiResponse<String>),
        (status = 409, description = "Email already registered", body = ApiResponse<String>),
        (status = 500, description = "Unexpected error", body = ApiResponse<String>)
    ),
    tag = "auth"
)]
pub async fn register(
    Extension(flow): Extension<Arc<AuthFlow>>,
    payload: Option<Json<RegisterRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return bad_request("Missing payload");
    };

    if !valid_name(&request.name) {
        return bad_request("Name must be between 1 and 100 characters");
    }
    if !valid_email(&request.email) {
        return bad_request("Invalid email format");
    }
    if !valid_password(&request.password) {
        return bad_request(
            "Password must be 8-100 characters with uppercase, lowercase, digit and symbol",
        );
    }

    match flow
        .register(&request.name, &request.email, &request.password)
        .await
    {
        Ok(message) => {
            info!("Registration accepted");
            (
                StatusCode::OK,
                Json(ApiResponse::ok("Registration successful", message)),
            )
                .into_response()
        }
        Err(err) => {
            warn!("Registration failed: {err}");
            error_response(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::tests::{body_json, test_flow};

    #[tokio::test]
    async fn register_returns_ok_and_envelope() {
        let flow = test_flow();
        let response = register(
            Extension(flow),
            Some(Json(RegisterRequest {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "Str0ng!Pass".to_string(),
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Registration successful");
    }

    #[tokio::test]
    async fn register_without_payload_is_bad_request() {
        let flow = test_flow();
        let response = register(Extension(flow), None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Missing payload");
    }

    #[tokio::test]
    async fn register_rejects_weak_password() {
        let flow = test_flow();
        let response = register(
            Extension(flow),
            Some(Json(RegisterRequest {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "password".to_string(),
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_duplicate_email_conflicts() {
        let flow = test_flow();
        let request = || {
            Some(Json(RegisterRequest {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "Str0ng!Pass".to_string(),
            }))
        };
        let first = register(Extension(flow.clone()), request()).await;
        assert_eq!(first.status(), StatusCode::OK);
        let second = register(Extension(flow), request()).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = body_json(second).await;
        assert_eq!(body["message"], "An account with this email already exists");
    }
}
