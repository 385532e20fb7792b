//! The auth workflow: register, verify, resend, login.
//!
//! Conceptually a per-account state machine, `Unregistered ->
//! PendingVerification -> Verified`, with the state derived from the account
//! record and its verification codes rather than stored as an enum.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::code::generate_code;
use super::config::AuthConfig;
use super::error::AuthError;
use super::model::{Account, AccountSummary, AuthSession, VerificationCode};
use super::notify::VerificationMailer;
use super::password::{hash_password, verify_password};
use super::store::{AccountStore, VerificationCodeStore};
use super::token::TokenIssuer;

/// Normalize an email for lookup and uniqueness checks.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Orchestrates the stores, the hasher, the token issuer, and the mailer.
///
/// Holds no mutable state of its own; operations may run concurrently and
/// rely on the stores for atomicity (email uniqueness on insert, conditional
/// update on code consumption).
pub struct AuthFlow {
    accounts: Arc<dyn AccountStore>,
    codes: Arc<dyn VerificationCodeStore>,
    mailer: Arc<dyn VerificationMailer>,
    tokens: TokenIssuer,
    config: AuthConfig,
}

impl AuthFlow {
    #[must_use]
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        codes: Arc<dyn VerificationCodeStore>,
        mailer: Arc<dyn VerificationMailer>,
        tokens: TokenIssuer,
        config: AuthConfig,
    ) -> Self {
        Self {
            accounts,
            codes,
            mailer,
            tokens,
            config,
        }
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Register a new account and dispatch its first verification code.
    ///
    /// # Errors
    ///
    /// `Conflict` if the email is already registered (the store's uniqueness
    /// constraint is the safety net; the existence check is a fast path), or
    /// `Downstream` on store/mailer failure. A mailer failure after the code
    /// is persisted still reports failure; the stored code stays valid and
    /// the user can retry via resend.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AuthError> {
        let email = normalize_email(email);

        if self.accounts.exists_by_email(&email).await? {
            warn!("registration rejected: email already exists");
            return Err(AuthError::Conflict);
        }

        let password_hash = hash_password(password)?;
        let account = self
            .accounts
            .insert(Account::new(name.to_string(), email, password_hash))
            .await?;

        self.issue_and_send_code(&account).await?;

        info!(account_id = %account.id, "account registered, verification pending");
        Ok(
            "Registration successful. Please check your email for verification code."
                .to_string(),
        )
    }

    /// Consume a verification code and mark the account verified.
    ///
    /// # Errors
    ///
    /// `InvalidCode` when no `(email, code)` record exists, `AlreadyUsed`
    /// when the code was consumed (including losing a race to a concurrent
    /// verify), `Expired` past the code's deadline, `NotFound` if the owning
    /// account vanished, `Downstream` on store failure.
    #[instrument(skip(self, code), fields(email = %email))]
    pub async fn verify_email(&self, email: &str, code: &str) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email);

        let record = self
            .codes
            .find_by_email_and_code(&email, code)
            .await?
            .ok_or(AuthError::InvalidCode)?;

        if record.used {
            return Err(AuthError::AlreadyUsed);
        }
        if record.is_expired_at(Utc::now()) {
            return Err(AuthError::Expired);
        }

        // The store's conditional update decides races: exactly one of two
        // concurrent verifies wins, the loser observes used = true.
        if !self.codes.consume(record.id).await? {
            return Err(AuthError::AlreadyUsed);
        }

        let mut account = self
            .accounts
            .find_by_id(record.account_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        account.verified = true;
        account.updated_at = Utc::now();
        let account = self.accounts.update(account).await?;

        let tokens = self.tokens.issue_tokens(&account)?;
        info!(account_id = %account.id, "email verified");

        Ok(AuthSession {
            tokens,
            account: AccountSummary::from(&account),
        })
    }

    /// Issue and dispatch a fresh verification code.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown emails, `AlreadyVerified` once the account is
    /// verified, `RateLimited` while the most recently created code is
    /// younger than the cooldown, `Downstream` on store/mailer failure.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn resend_code(&self, email: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);

        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::NotFound)?;

        if account.verified {
            return Err(AuthError::AlreadyVerified);
        }

        // Only the most recently created code drives the cooldown window;
        // older codes may still be outstanding and valid.
        if let Some(last_sent_at) = self.codes.most_recent_created_at(account.id).await? {
            let elapsed = Utc::now().signed_duration_since(last_sent_at);
            if elapsed < Duration::seconds(self.config.resend_cooldown_seconds()) {
                warn!(account_id = %account.id, "resend rejected: cooldown active");
                return Err(AuthError::RateLimited);
            }
        }

        self.issue_and_send_code(&account).await?;

        info!(account_id = %account.id, "verification code resent");
        Ok("Verification code sent successfully.".to_string())
    }

    /// Authenticate with email and password and issue a fresh token pair.
    ///
    /// Never mutates stored state. Unknown email and wrong password produce
    /// the identical `InvalidCredentials` outcome; a correct password on an
    /// unverified account produces the distinct `EmailNotVerified`.
    ///
    /// # Errors
    ///
    /// `InvalidCredentials`, `EmailNotVerified`, or `Downstream`.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email);

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(&account.password_hash, password) {
            warn!(account_id = %account.id, "login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        if !account.verified {
            return Err(AuthError::EmailNotVerified);
        }

        let tokens = self.tokens.issue_tokens(&account)?;
        info!(account_id = %account.id, "login successful");

        Ok(AuthSession {
            tokens,
            account: AccountSummary::from(&account),
        })
    }

    /// Generate a code, persist it, then hand it to the mailer.
    async fn issue_and_send_code(&self, account: &Account) -> Result<(), AuthError> {
        let code = generate_code();
        let record =
            VerificationCode::new(account.id, code.clone(), self.config.code_ttl_minutes());
        self.codes.insert(record).await?;

        self.mailer
            .send_verification_code(&account.email, &account.name, &code)
            .await
            .map_err(AuthError::Downstream)?;

        Ok(())
    }
}
