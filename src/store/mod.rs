//! Production store implementations over Postgres.

mod postgres;

pub use postgres::{PgAccountStore, PgVerificationCodeStore};
