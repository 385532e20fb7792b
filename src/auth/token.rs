//! Signed access tokens and opaque refresh tokens.

use anyhow::{anyhow, Context, Result};
use base64ct::{Base64, Encoding};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{rngs::OsRng, RngCore};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::TokenConfig;
use super::model::{Account, IssuedTokenPair};

const REFRESH_TOKEN_BYTES: usize = 32;

/// Identity claims embedded in the access token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    name: String,
    email_verified: bool,
    iss: String,
    aud: String,
    exp: i64,
}

/// Issues HS256-signed access tokens and opaque refresh tokens.
///
/// Stateless beyond the shared signing secret; validation uses the same
/// secret with zero clock-skew leeway.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    access_ttl_minutes: i64,
}

impl TokenIssuer {
    /// Build an issuer from configuration.
    ///
    /// # Errors
    ///
    /// Fails if the signing secret, issuer, or audience is empty. This is a
    /// startup-time configuration error.
    pub fn new(config: &TokenConfig) -> Result<Self> {
        let secret = config.secret().expose_secret();
        if secret.is_empty() {
            return Err(anyhow!("token signing secret is not configured"));
        }
        if config.issuer().is_empty() {
            return Err(anyhow!("token issuer is not configured"));
        }
        if config.audience().is_empty() {
            return Err(anyhow!("token audience is not configured"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Zero leeway: an access token is invalid the second it expires.
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer()]);
        validation.set_audience(&[config.audience()]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer: config.issuer().to_string(),
            audience: config.audience().to_string(),
            access_ttl_minutes: config.access_ttl_minutes(),
        })
    }

    /// Issue a fresh token pair for an account.
    ///
    /// The refresh token carries no identity and cannot be decoded; it is 32
    /// bytes of OS randomness, base64-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if signing or the random source fails.
    pub fn issue_tokens(&self, account: &Account) -> Result<IssuedTokenPair> {
        let expires_at = Utc::now() + Duration::minutes(self.access_ttl_minutes);
        let claims = Claims {
            sub: account.id.to_string(),
            email: account.email.clone(),
            name: account.name.clone(),
            email_verified: account.verified,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: expires_at.timestamp(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .context("failed to sign access token")?;
        let refresh_token = generate_refresh_token()?;

        Ok(IssuedTokenPair {
            access_token,
            refresh_token,
            expires_at,
        })
    }

    /// Validate an access token and return the embedded account id.
    ///
    /// Signature, issuer, audience, and expiry are all checked. Every failure
    /// collapses to `None`; callers never learn which check failed.
    #[must_use]
    pub fn validate_access_token(&self, token: &str) -> Option<Uuid> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).ok()?;
        Uuid::parse_str(&data.claims.sub).ok()
    }
}

/// Generate an opaque refresh token from the OS CSPRNG.
fn generate_refresh_token() -> Result<String> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate refresh token")?;
    Ok(Base64::encode_string(&bytes))
}
