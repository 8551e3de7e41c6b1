//! Warden Authorization
//!
//! Aggregates permission and role decisions across every authorizing realm.
//! [`ModularRealmAuthorizer`] implements `AuthorizerClient` for consumers
//! and hands the configured permission resolver to realms that accept one.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::AuthzConfig;
pub use domain::ModularRealmAuthorizer;
