#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Authorization SDK
//!
//! This crate provides the public API for warden authorization:
//!
//! - [`AuthorizerClient`] - Public API trait for permission and role checks
//! - [`SimpleRole`] - Named bundle of permissions
//! - [`IndexedAuthorizationInfo`] - Roles plus permissions indexed by domain
//! - [`AuthorizationError`] / [`IndexingError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use authz_sdk::AuthorizerClient;
//!
//! let ids = account.identifiers();
//! authorizer.check_permission(&ids, &["invoice:approve".to_owned()])?;
//! ```

pub mod api;
pub mod error;
pub mod models;

pub use api::AuthorizerClient;
pub use error::{AuthorizationError, IndexingError};
pub use models::{IndexedAuthorizationInfo, SimpleRole};
