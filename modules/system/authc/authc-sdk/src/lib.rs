#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Authentication SDK
//!
//! This crate provides the public API for warden authentication:
//!
//! - [`AuthenticatorClient`] - Public API trait for consumers
//! - [`AuthenticationAttempt`] - A token paired with the realms to consult
//! - [`AuthenticationError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use authc_sdk::AuthenticatorClient;
//!
//! let token = UsernamePasswordToken::new("jsmith", "secret");
//! let account = authenticator.authenticate_account(Box::new(token))?;
//! ```

pub mod api;
pub mod error;
pub mod models;

pub use api::AuthenticatorClient;
pub use error::AuthenticationError;
pub use models::AuthenticationAttempt;
