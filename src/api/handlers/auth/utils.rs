//! Input validation and error-to-response mapping shared by the auth handlers.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use regex::Regex;
use std::sync::OnceLock;
use tracing::error;

use crate::auth::AuthError;

use super::types::ApiResponse;

const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 100;
const NAME_MAX: usize = 100;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

pub fn valid_email(email: &str) -> bool {
    !email.trim().is_empty() && email_regex().is_match(email.trim())
}

/// 8-100 chars with at least one uppercase, lowercase, digit and symbol.
pub fn valid_password(password: &str) -> bool {
    let length = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) {
        return false;
    }
    let upper = password.chars().any(char::is_uppercase);
    let lower = password.chars().any(char::is_lowercase);
    let digit = password.chars().any(|c| c.is_ascii_digit());
    let symbol = password.chars().any(|c| !c.is_alphanumeric());
    upper && lower && digit && symbol
}

pub fn valid_code(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

pub fn valid_name(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= NAME_MAX
}

pub fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::failure(message)),
    )
        .into_response()
}

/// Maps workflow errors to status codes, keeping the message the caller sees
/// aligned with the error variant. Downstream failures are logged and hidden.
pub fn error_response(err: &AuthError) -> Response {
    let status = match err {
        AuthError::Conflict => StatusCode::CONFLICT,
        AuthError::NotFound => StatusCode::NOT_FOUND,
        AuthError::InvalidCode
        | AuthError::AlreadyUsed
        | AuthError::Expired
        | AuthError::AlreadyVerified => StatusCode::BAD_REQUEST,
        AuthError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        AuthError::InvalidCredentials | AuthError::EmailNotVerified => StatusCode::UNAUTHORIZED,
        AuthError::Downstream(source) => {
            error!("Unexpected error: {source:#}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::failure("An unexpected error occurred")),
            )
                .into_response();
        }
    };
    (status, Json(ApiResponse::<()>::failure(err.to_string()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(valid_email("alice@example.com"));
        assert!(valid_email("  alice@example.com  "));
        assert!(!valid_email("alice@example"));
        assert!(!valid_email("alice example@x.com"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email(""));
    }

    #[test]
    fn password_validation() {
        assert!(valid_password("Str0ng!Pass"));
        assert!(!valid_password("Sh0rt!A"));
        assert!(!valid_password("alllowercase1!"));
        assert!(!valid_password("ALLUPPERCASE1!"));
        assert!(!valid_password("NoDigitsHere!"));
        assert!(!valid_password("NoSymbols123"));
        assert!(!valid_password(&format!("Aa1!{}", "x".repeat(100))));
    }

    #[test]
    fn code_validation() {
        assert!(valid_code("123456"));
        assert!(!valid_code("12345"));
        assert!(!valid_code("1234567"));
        assert!(!valid_code("12345a"));
    }

    #[test]
    fn name_validation() {
        assert!(valid_name("Alice"));
        assert!(!valid_name("   "));
        assert!(!valid_name(&"x".repeat(101)));
    }

    #[tokio::test]
    async fn status_mapping() {
        let cases = [
            (AuthError::Conflict, StatusCode::CONFLICT),
            (AuthError::NotFound, StatusCode::NOT_FOUND),
            (AuthError::InvalidCode, StatusCode::BAD_REQUEST),
            (AuthError::AlreadyUsed, StatusCode::BAD_REQUEST),
            (AuthError::Expired, StatusCode::BAD_REQUEST),
            (AuthError::AlreadyVerified, StatusCode::BAD_REQUEST),
            (AuthError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::EmailNotVerified, StatusCode::UNAUTHORIZED),
        ];
        for (err, expected) in cases {
            assert_eq!(error_response(&err).status(), expected, "{err}");
        }
    }

    #[tokio::test]
    async fn downstream_failures_are_hidden() {
        let err = AuthError::Downstream(anyhow::anyhow!("pool exhausted"));
        let response = error_response(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("An unexpected error occurred"));
        assert!(!text.contains("pool exhausted"));
    }
}
