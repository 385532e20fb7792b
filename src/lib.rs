//! ensaluto: account registration, email-based verification, and credential
//! issuance.
//!
//! The [`auth`] module is the core: the verification-code lifecycle, the
//! password-credential contract, and token issuance/validation. [`store`]
//! provides the Postgres implementations of the core's store traits, and
//! [`api`] exposes the workflow over HTTP.

pub mod api;
pub mod auth;
pub mod cli;
pub mod store;
