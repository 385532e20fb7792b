//! Error taxonomy for the auth workflow.

use thiserror::Error;

use super::store::StoreError;

/// Every failure the workflow reports to its caller.
///
/// Messages double as the user-visible text. Unknown-email and bad-password
/// logins share the single [`AuthError::InvalidCredentials`] variant so the
/// two cases are indistinguishable from the outside.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("An account with this email already exists")]
    Conflict,

    #[error("Account not found")]
    NotFound,

    #[error("Invalid verification code")]
    InvalidCode,

    #[error("Verification code has already been used")]
    AlreadyUsed,

    #[error("Verification code has expired")]
    Expired,

    #[error("Please wait before requesting a new verification code")]
    RateLimited,

    #[error("Email is already verified")]
    AlreadyVerified,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Please verify your email before logging in")]
    EmailNotVerified,

    #[error("downstream failure: {0}")]
    Downstream(#[source] anyhow::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => Self::Conflict,
            StoreError::Backend(err) => Self::Downstream(err),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Downstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn store_duplicate_maps_to_conflict() {
        let err = AuthError::from(StoreError::Duplicate);
        assert!(matches!(err, AuthError::Conflict));
    }

    #[test]
    fn store_backend_maps_to_downstream() {
        let err = AuthError::from(StoreError::Backend(anyhow!("connection reset")));
        assert!(matches!(err, AuthError::Downstream(_)));
    }

    #[test]
    fn login_failures_share_one_message() {
        // Unknown email and wrong password must be indistinguishable.
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
        assert_ne!(
            AuthError::InvalidCredentials.to_string(),
            AuthError::EmailNotVerified.to_string()
        );
    }
}
