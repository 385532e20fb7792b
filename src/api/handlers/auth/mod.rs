//! Registration, email verification, code resend and login endpoints.

pub(crate) mod login;
pub(crate) mod register;
pub(crate) mod resend;
pub(crate) mod types;
pub(crate) mod utils;
pub(crate) mod verify;

pub use login::login;
pub use register::register;
pub use resend::resend_code;
pub use types::{
    AccountResponse, ApiResponse, LoginRequest, RegisterRequest, ResendCodeRequest,
    SessionResponse, VerifyEmailRequest,
};
pub use verify::verify_email;

/// Shared fixtures for the handler tests: an [`AuthFlow`] over in-memory
/// stores with a mailer that records the last code it was asked to send.
#[cfg(test)]
pub(crate) mod tests {
    use anyhow::Result;
    use async_trait::async_trait;
    use axum::{response::Response, Extension, Json};
    use secrecy::SecretString;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    use crate::auth::{
        AuthConfig, AuthFlow, MemoryStore, TokenConfig, TokenIssuer, VerificationMailer,
    };

    use super::types::VerifyEmailRequest;

    struct CaptureMailer {
        last_code: Arc<Mutex<Option<String>>>,
    }

    #[async_trait]
    impl VerificationMailer for CaptureMailer {
        async fn send_verification_code(&self, _email: &str, _name: &str, code: &str) -> Result<()> {
            *self.last_code.lock().await = Some(code.to_string());
            Ok(())
        }
    }

    fn token_issuer() -> TokenIssuer {
        TokenIssuer::new(&TokenConfig::new(
            SecretString::from("test-secret-test-secret-test-secret".to_string()),
            "ensaluto".to_string(),
            "ensaluto-clients".to_string(),
        ))
        .unwrap()
    }

    fn flow_with_capture() -> (Arc<AuthFlow>, Arc<Mutex<Option<String>>>) {
        let store = Arc::new(MemoryStore::new());
        let last_code = Arc::new(Mutex::new(None));
        let mailer = Arc::new(CaptureMailer {
            last_code: last_code.clone(),
        });
        let flow = Arc::new(AuthFlow::new(
            store.clone(),
            store,
            mailer,
            token_issuer(),
            AuthConfig::new(),
        ));
        (flow, last_code)
    }

    pub(crate) fn test_flow() -> Arc<AuthFlow> {
        flow_with_capture().0
    }

    /// Register an account through the workflow and return the code that
    /// would have been emailed to it.
    pub(crate) async fn register_account(email: &str) -> (Arc<AuthFlow>, String) {
        let (flow, last_code) = flow_with_capture();
        flow.register("Alice", email, "Str0ng!Pass").await.unwrap();
        let code = last_code.lock().await.clone().unwrap();
        (flow, code)
    }

    pub(crate) async fn verified_flow(email: &str) -> Arc<AuthFlow> {
        let (flow, code) = register_account(email).await;
        let response = super::verify_email(
            Extension(flow.clone()),
            Some(Json(VerifyEmailRequest {
                email: email.to_string(),
                code,
            })),
        )
        .await;
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        flow
    }

    pub(crate) async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
