//! Outbound delivery of verification codes.
//!
//! The workflow only sees the [`VerificationMailer`] trait. The default
//! sender for local dev is [`LogMailer`], which logs and returns `Ok(())`;
//! real SMTP/API delivery implements the same trait.

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Delivery abstraction for verification codes.
#[async_trait]
pub trait VerificationMailer: Send + Sync {
    /// Deliver a code to the given address or return an error.
    async fn send_verification_code(&self, email: &str, name: &str, code: &str) -> Result<()>;
}

/// Render the message body sent alongside a code.
#[must_use]
pub fn verification_message(name: &str, code: &str) -> String {
    format!(
        "Hello {name},\n\n\
         Please use the following verification code to complete your registration:\n\n\
         {code}\n\n\
         This code will expire in 10 minutes. If you didn't request this\n\
         verification, please ignore this email."
    )
}

/// Local dev sender that logs the code instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogMailer;

#[async_trait]
impl VerificationMailer for LogMailer {
    async fn send_verification_code(&self, email: &str, name: &str, code: &str) -> Result<()> {
        info!(
            to_email = %email,
            subject = "Email Verification Code",
            body = %verification_message(name, code),
            "verification email send stub"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_contains_name_code_and_expiry() {
        let body = verification_message("Alice", "123456");
        assert!(body.contains("Hello Alice"));
        assert!(body.contains("123456"));
        assert!(body.contains("10 minutes"));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        let mailer = LogMailer;
        assert!(mailer
            .send_verification_code("alice@example.com", "Alice", "123456")
            .await
            .is_ok());
    }
}
