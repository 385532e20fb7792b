//! Postgres-backed account and verification-code stores.
//!
//! Email uniqueness and single-use codes are enforced here, in SQL: the
//! unique index on `accounts.email` rejects duplicate registrations even
//! under concurrent attempts, and `consume` is a conditional `UPDATE` so
//! exactly one of two racing verifies wins.

use anyhow::Error;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use crate::auth::model::{Account, VerificationCode};
use crate::auth::store::{AccountStore, StoreError, VerificationCodeStore};

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

fn backend(err: sqlx::Error, context: &'static str) -> StoreError {
    StoreError::Backend(Error::new(err).context(context))
}

fn account_from_row(row: &sqlx::postgres::PgRow) -> Account {
    Account {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        verified: row.get("verified"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn code_from_row(row: &sqlx::postgres::PgRow) -> VerificationCode {
    VerificationCode {
        id: row.get("id"),
        account_id: row.get("account_id"),
        code: row.get("code"),
        expires_at: row.get("expires_at"),
        used: row.get("used"),
        created_at: row.get("created_at"),
    }
}

#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let query = r"
            SELECT id, name, email, password_hash, verified, created_at, updated_at
            FROM accounts
            WHERE email = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| backend(err, "failed to find account by email"))?;
        Ok(row.as_ref().map(account_from_row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let query = r"
            SELECT id, name, email, password_hash, verified, created_at, updated_at
            FROM accounts
            WHERE id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| backend(err, "failed to find account by id"))?;
        Ok(row.as_ref().map(account_from_row))
    }

    async fn insert(&self, account: Account) -> Result<Account, StoreError> {
        let query = r"
            INSERT INTO accounts
                (id, name, email, password_hash, verified, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, password_hash, verified, created_at, updated_at
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(account.id)
            .bind(&account.name)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.verified)
            .bind(account.created_at)
            .bind(account.updated_at)
            .fetch_one(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::Duplicate
                } else {
                    backend(err, "failed to insert account")
                }
            })?;
        Ok(account_from_row(&row))
    }

    async fn update(&self, account: Account) -> Result<Account, StoreError> {
        let query = r"
            UPDATE accounts
            SET name = $2,
                email = $3,
                password_hash = $4,
                verified = $5,
                updated_at = $6
            WHERE id = $1
            RETURNING id, name, email, password_hash, verified, created_at, updated_at
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(account.id)
            .bind(&account.name)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.verified)
            .bind(account.updated_at)
            .fetch_one(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| backend(err, "failed to update account"))?;
        Ok(account_from_row(&row))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let query = "SELECT 1 FROM accounts WHERE email = $1 LIMIT 1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| backend(err, "failed to check account existence"))?;
        Ok(row.is_some())
    }
}

#[derive(Clone)]
pub struct PgVerificationCodeStore {
    pool: PgPool,
}

impl PgVerificationCodeStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationCodeStore for PgVerificationCodeStore {
    async fn insert(&self, code: VerificationCode) -> Result<VerificationCode, StoreError> {
        let query = r"
            INSERT INTO verification_codes
                (id, account_id, code, expires_at, used, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, account_id, code, expires_at, used, created_at
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(code.id)
            .bind(code.account_id)
            .bind(&code.code)
            .bind(code.expires_at)
            .bind(code.used)
            .bind(code.created_at)
            .fetch_one(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| backend(err, "failed to insert verification code"))?;
        Ok(code_from_row(&row))
    }

    async fn find_by_email_and_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<VerificationCode>, StoreError> {
        let query = r"
            SELECT verification_codes.id,
                   verification_codes.account_id,
                   verification_codes.code,
                   verification_codes.expires_at,
                   verification_codes.used,
                   verification_codes.created_at
            FROM verification_codes
            JOIN accounts ON accounts.id = verification_codes.account_id
            WHERE accounts.email = $1
              AND verification_codes.code = $2
            ORDER BY verification_codes.created_at DESC
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .bind(code)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| backend(err, "failed to find verification code"))?;
        Ok(row.as_ref().map(code_from_row))
    }

    async fn consume(&self, id: Uuid) -> Result<bool, StoreError> {
        // Conditional update: only the first caller flips `used`.
        let query = r"
            UPDATE verification_codes
            SET used = TRUE
            WHERE id = $1
              AND used = FALSE
            RETURNING id
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| backend(err, "failed to consume verification code"))?;
        Ok(row.is_some())
    }

    async fn most_recent_created_at(
        &self,
        account_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let query = r"
            SELECT created_at
            FROM verification_codes
            WHERE account_id = $1
            ORDER BY created_at DESC
            LIMIT 1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| backend(err, "failed to read latest code timestamp"))?;
        Ok(row.map(|row| row.get("created_at")))
    }
}
