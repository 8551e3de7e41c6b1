#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Warden security primitives.
//!
//! Value types shared by the authentication and authorization modules:
//!
//! - [`Permission`] - wildcard permission with the `implies` relation
//! - [`PermissionResolver`] - converts permission strings into [`Permission`]s
//! - [`IdentifierCollection`] - per-realm identifiers of an authenticated subject
//! - [`AuthenticationToken`] - principal + credentials submitted for authentication
//! - [`Account`] - the result of a successful authentication

pub mod account;
pub mod identifiers;
pub mod permission;
pub mod resolver;
pub mod token;

pub use account::{Account, AccountId};
pub use identifiers::IdentifierCollection;
pub use permission::{Permission, PermissionParseError, WILDCARD_TOKEN};
pub use resolver::{PermissionResolver, WildcardPermissionResolver};
pub use token::{AuthenticationToken, UsernamePasswordToken};
