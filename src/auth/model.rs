//! Domain records for accounts, verification codes, and issued credentials.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// A registered account.
///
/// The email is stored case-folded; lookups and uniqueness checks always
/// operate on the normalized form. The password hash is opaque and excluded
/// from `Debug` output.
#[derive(Clone)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new unverified account. The email must already be normalized.
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("verified", &self.verified)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// A single emailed verification code.
///
/// Codes are never deleted; a consumed code keeps its row with `used = true`
/// so later attempts can be distinguished from codes that never existed.
#[derive(Clone, Debug)]
pub struct VerificationCode {
    pub id: Uuid,
    pub account_id: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub created_at: DateTime<Utc>,
}

impl VerificationCode {
    #[must_use]
    pub fn new(account_id: Uuid, code: String, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            account_id,
            code,
            expires_at: now + Duration::minutes(ttl_minutes),
            used: false,
            created_at: now,
        }
    }

    /// A code is expired once `now` reaches `expires_at`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Public view of an account, safe to return to callers.
#[derive(Clone, Debug, Serialize)]
pub struct AccountSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub verified: bool,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            verified: account.verified,
        }
    }
}

/// Access/refresh token pair produced on successful verify or login.
///
/// This is a response value, not a stored entity. The refresh token is opaque
/// randomness and shares no bits with the access token.
#[derive(Clone, Debug)]
pub struct IssuedTokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful verify or login: fresh tokens plus the public
/// account view.
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub tokens: IssuedTokenPair,
    pub account: AccountSummary,
}
