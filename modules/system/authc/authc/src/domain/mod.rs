//! Domain layer for warden authentication.

pub mod service;
pub mod strategy;

pub use service::ModularRealmAuthenticator;
pub use strategy::{
    AllRealmsSuccessful, AtLeastOneRealmSuccessful, AuthenticationStrategy, FirstRealmSuccessful,
};
