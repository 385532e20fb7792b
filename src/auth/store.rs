//! Store traits for accounts and verification codes, plus in-memory doubles.
//!
//! The workflow only talks to these traits. Production uses the Postgres
//! implementations in [`crate::store`]; tests and local development use
//! [`MemoryStore`].

use anyhow::Error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::model::{Account, VerificationCode};

/// Failures surfaced by a store implementation.
#[derive(Debug, ThisError)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("record already exists")]
    Duplicate,

    /// Anything else: connectivity, timeouts, malformed rows.
    #[error(transparent)]
    Backend(#[from] Error),
}

/// Persistence for [`Account`] records.
///
/// Implementations must enforce email uniqueness themselves; the workflow's
/// existence pre-check is a fast path, not the safety net.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;
    async fn insert(&self, account: Account) -> Result<Account, StoreError>;
    async fn update(&self, account: Account) -> Result<Account, StoreError>;
    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;
}

/// Persistence for [`VerificationCode`] records. Codes are append-only.
#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
    async fn insert(&self, code: VerificationCode) -> Result<VerificationCode, StoreError>;

    /// Latest code matching the normalized email and exact code string, used
    /// or not. The caller decides how to report used/expired records.
    async fn find_by_email_and_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<VerificationCode>, StoreError>;

    /// Atomically flip `used` to true if it is still false. Returns whether
    /// this call won; under a race exactly one caller sees `true`.
    async fn consume(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Creation time of the most recently created code for the account,
    /// regardless of used/expired state. Drives the resend cooldown.
    async fn most_recent_created_at(
        &self,
        account_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, StoreError>;
}

/// In-memory implementation of both store traits.
///
/// Test double and local-dev backend; a single instance serves both traits so
/// code lookups can join against account emails.
#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
    codes: Mutex<HashMap<Uuid, VerificationCode>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts
            .values()
            .find(|account| account.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.get(&id).cloned())
    }

    async fn insert(&self, account: Account) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().await;
        if accounts
            .values()
            .any(|existing| existing.email == account.email)
        {
            return Err(StoreError::Duplicate);
        }
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.lock().await;
        accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let accounts = self.accounts.lock().await;
        Ok(accounts.values().any(|account| account.email == email))
    }
}

#[async_trait]
impl VerificationCodeStore for MemoryStore {
    async fn insert(&self, code: VerificationCode) -> Result<VerificationCode, StoreError> {
        let mut codes = self.codes.lock().await;
        codes.insert(code.id, code.clone());
        Ok(code)
    }

    async fn find_by_email_and_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<VerificationCode>, StoreError> {
        let account_id = {
            let accounts = self.accounts.lock().await;
            accounts
                .values()
                .find(|account| account.email == email)
                .map(|account| account.id)
        };
        let Some(account_id) = account_id else {
            return Ok(None);
        };

        let codes = self.codes.lock().await;
        Ok(codes
            .values()
            .filter(|record| record.account_id == account_id && record.code == code)
            .max_by_key(|record| record.created_at)
            .cloned())
    }

    async fn consume(&self, id: Uuid) -> Result<bool, StoreError> {
        // The mutex makes check-and-set atomic, matching the conditional
        // UPDATE the Postgres store issues.
        let mut codes = self.codes.lock().await;
        match codes.get_mut(&id) {
            Some(record) if !record.used => {
                record.used = true;
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Ok(false),
        }
    }

    async fn most_recent_created_at(
        &self,
        account_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let codes = self.codes.lock().await;
        Ok(codes
            .values()
            .filter(|record| record.account_id == account_id)
            .map(|record| record.created_at)
            .max())
    }
}
