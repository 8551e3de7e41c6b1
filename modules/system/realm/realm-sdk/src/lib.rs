#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Realm SDK
//!
//! A realm is a pluggable source of authentication and authorization
//! decisions. This crate defines the contracts realms implement and the
//! collaborators they may be handed:
//!
//! - [`Realm`] - Base trait every realm implements (authentication plus capability queries)
//! - [`AuthorizingRealm`] - Optional capability answering permission and role checks
//! - [`PermissionResolverAware`] - Optional capability accepting a shared [`PermissionResolver`](warden_security::PermissionResolver)
//! - [`AccountCacheAware`] - Optional capability accepting a [`CacheManager`]
//! - [`Cache`] / [`CacheManager`] - Cache contract
//! - [`PasswordService`] - Password verification contract
//! - [`RealmError`] - Errors raised by realms
//!
//! ## Usage
//!
//! ```ignore
//! use realm_sdk::Realm;
//!
//! let account = realm.authenticate_account(&token)?;
//! if let Some(authz) = realm.as_authorizing() {
//!     let results = authz.is_permitted(&account.identifiers(), &["doc:read".to_owned()]);
//! }
//! ```

pub mod api;
pub mod cache;
pub mod error;
pub mod password;

pub use api::{AccountCacheAware, AuthorizingRealm, PermissionResolverAware, Realm};
pub use cache::{Cache, CacheError, CacheManager};
pub use error::RealmError;
pub use password::PasswordService;
