//! Core credential-issuance workflow.
//!
//! Everything with a real invariant lives here: the verification-code
//! lifecycle (expiry, single use, resend cooldown), the password-credential
//! contract, and signed token issuance/validation. Persistence and email
//! delivery are collaborator traits ([`store`], [`notify`]) so the workflow
//! can be exercised against in-memory doubles.

pub mod code;
pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod password;
pub mod store;
pub mod token;
pub mod workflow;

pub use config::{AuthConfig, TokenConfig};
pub use error::AuthError;
pub use notify::{LogMailer, VerificationMailer};
pub use store::{AccountStore, MemoryStore, StoreError, VerificationCodeStore};
pub use token::TokenIssuer;
pub use workflow::AuthFlow;
