//! Immutable configuration injected at construction.

use secrecy::SecretString;

const DEFAULT_CODE_TTL_MINUTES: i64 = 10;
const DEFAULT_RESEND_COOLDOWN_SECONDS: i64 = 60;
const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 60;

/// Tunables for the verification-code lifecycle.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    code_ttl_minutes: i64,
    resend_cooldown_seconds: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            code_ttl_minutes: DEFAULT_CODE_TTL_MINUTES,
            resend_cooldown_seconds: DEFAULT_RESEND_COOLDOWN_SECONDS,
        }
    }

    #[must_use]
    pub fn with_code_ttl_minutes(mut self, minutes: i64) -> Self {
        self.code_ttl_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_resend_cooldown_seconds(mut self, seconds: i64) -> Self {
        self.resend_cooldown_seconds = seconds;
        self
    }

    #[must_use]
    pub fn code_ttl_minutes(&self) -> i64 {
        self.code_ttl_minutes
    }

    #[must_use]
    pub fn resend_cooldown_seconds(&self) -> i64 {
        self.resend_cooldown_seconds
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Signing configuration for the token issuer.
///
/// Missing secret, issuer, or audience is a startup error surfaced by
/// [`crate::auth::TokenIssuer::new`], not a per-request failure.
#[derive(Clone, Debug)]
pub struct TokenConfig {
    secret: SecretString,
    issuer: String,
    audience: String,
    access_ttl_minutes: i64,
}

impl TokenConfig {
    #[must_use]
    pub fn new(secret: SecretString, issuer: String, audience: String) -> Self {
        Self {
            secret,
            issuer,
            audience,
            access_ttl_minutes: DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
        }
    }

    #[must_use]
    pub fn with_access_ttl_minutes(mut self, minutes: i64) -> Self {
        self.access_ttl_minutes = minutes;
        self
    }

    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.secret
    }

    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub fn audience(&self) -> &str {
        &self.audience
    }

    #[must_use]
    pub fn access_ttl_minutes(&self) -> i64 {
        self.access_ttl_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new();
        assert_eq!(config.code_ttl_minutes(), DEFAULT_CODE_TTL_MINUTES);
        assert_eq!(
            config.resend_cooldown_seconds(),
            DEFAULT_RESEND_COOLDOWN_SECONDS
        );

        let config = config
            .with_code_ttl_minutes(5)
            .with_resend_cooldown_seconds(30);
        assert_eq!(config.code_ttl_minutes(), 5);
        assert_eq!(config.resend_cooldown_seconds(), 30);
    }

    #[test]
    fn token_config_holds_values() {
        let config = TokenConfig::new(
            SecretString::from("s3cret".to_string()),
            "ensaluto".to_string(),
            "ensaluto-clients".to_string(),
        )
        .with_access_ttl_minutes(15);

        assert_eq!(config.secret().expose_secret(), "s3cret");
        assert_eq!(config.issuer(), "ensaluto");
        assert_eq!(config.audience(), "ensaluto-clients");
        assert_eq!(config.access_ttl_minutes(), 15);
    }

    #[test]
    fn token_config_debug_hides_secret() {
        let config = TokenConfig::new(
            SecretString::from("s3cret".to_string()),
            "ensaluto".to_string(),
            "ensaluto-clients".to_string(),
        );
        assert!(!format!("{config:?}").contains("s3cret"));
    }
}
