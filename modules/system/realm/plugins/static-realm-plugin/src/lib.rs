#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Realm Plugin
//!
//! A realm whose accounts, roles and permissions come straight from
//! configuration. It implements every realm capability: username/password
//! authentication, permission and role checks, permission resolver
//! injection and account caching.
//!
//! ## Configuration
//!
//! ```yaml
//! realms:
//!   - name: corp
//!     private_salt: "pepper"
//!     cache_accounts: true
//!     roles:
//!       - name: auditor
//!         permissions: ["ledger:read", "report:read,export"]
//!     accounts:
//!       - username: jsmith
//!         account_id: "12345"
//!         password_hash: "<hex sha256 of private_salt || password>"
//!         roles: ["auditor"]
//!         permissions: ["ledger:write:2024"]
//!         attributes:
//!           email: jsmith@example.com
//! ```

pub mod config;
pub mod domain;

pub use config::{AccountConfig, RoleConfig, StaticRealmConfig};
pub use domain::{InMemoryCache, InMemoryCacheManager, SaltedSha256PasswordService, StaticRealm};
