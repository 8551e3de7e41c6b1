//! Domain layer for warden authorization.

pub mod service;

pub use service::ModularRealmAuthorizer;
