//! Warden Authentication
//!
//! Runs authentication attempts across several realms and folds the
//! per-realm outcomes into one account according to a configurable
//! strategy. [`ModularRealmAuthenticator`](domain::ModularRealmAuthenticator)
//! implements `AuthenticatorClient` for consumers.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::{AuthcConfig, StrategyKind};
pub use domain::{
    AllRealmsSuccessful, AtLeastOneRealmSuccessful, AuthenticationStrategy, FirstRealmSuccessful,
    ModularRealmAuthenticator,
};
