//! Authentication strategies.
//!
//! A strategy walks the realms of an [`AuthenticationAttempt`] and folds
//! their outcomes into a single account or a single error. Accounts from
//! several realms are merged in realm order with [`Account::merge`], so the
//! first non-empty id and the first writer of every attribute win.

use std::sync::Arc;

use authc_sdk::{AuthenticationAttempt, AuthenticationError};
use realm_sdk::{Realm, RealmError};
use tracing::{debug, warn};
use warden_security::{Account, AuthenticationToken};

/// Policy combining per-realm authentication outcomes.
pub trait AuthenticationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Run the attempt.
    ///
    /// # Errors
    ///
    /// - `NoRealmsConfigured` if the attempt has no realms; no realm is queried
    /// - any other [`AuthenticationError`] according to the strategy's policy
    fn execute(&self, attempt: &AuthenticationAttempt) -> Result<Account, AuthenticationError>;
}

/// Consult only the first realm and pass its outcome through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstRealmSuccessful;

/// Consult every realm and succeed if any of them accepts the attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtLeastOneRealmSuccessful;

/// Consult every realm and fail as soon as one of them rejects the attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllRealmsSuccessful;

impl AuthenticationStrategy for FirstRealmSuccessful {
    fn name(&self) -> &'static str {
        "first_realm_successful"
    }

    #[tracing::instrument(skip_all, fields(strategy = self.name(), realms = attempt.realms().len()))]
    fn execute(&self, attempt: &AuthenticationAttempt) -> Result<Account, AuthenticationError> {
        let realm = attempt
            .realms()
            .first()
            .ok_or(AuthenticationError::NoRealmsConfigured)?;

        let token = attempt.token();
        if !realm.supports(token) {
            return Err(AuthenticationError::UnsupportedToken {
                realm: realm.name().to_owned(),
            });
        }

        let account = consult(realm, token).map_err(|source| AuthenticationError::Realm {
            realm: realm.name().to_owned(),
            source,
        })?;

        let mut merged = Account::default();
        merged.merge(realm.name(), account);
        Ok(merged)
    }
}

impl AuthenticationStrategy for AtLeastOneRealmSuccessful {
    fn name(&self) -> &'static str {
        "at_least_one_realm_successful"
    }

    #[tracing::instrument(skip_all, fields(strategy = self.name(), realms = attempt.realms().len()))]
    fn execute(&self, attempt: &AuthenticationAttempt) -> Result<Account, AuthenticationError> {
        ensure_realms(attempt)?;

        let token = attempt.token();
        let mut merged: Option<Account> = None;
        let mut failures: Vec<(String, RealmError)> = Vec::new();

        for realm in attempt.realms() {
            let outcome = if realm.supports(token) {
                consult(realm, token)
            } else {
                Err(RealmError::UnsupportedToken {
                    kind: token.kind().to_owned(),
                })
            };

            match outcome {
                Ok(account) => merged
                    .get_or_insert_with(Account::default)
                    .merge(realm.name(), account),
                Err(e) => {
                    warn!(
                        realm = %realm.name(),
                        error = %e,
                        "realm rejected authentication attempt, continuing"
                    );
                    failures.push((realm.name().to_owned(), e));
                }
            }
        }

        merged.ok_or(AuthenticationError::NoRealmSucceeded { failures })
    }
}

impl AuthenticationStrategy for AllRealmsSuccessful {
    fn name(&self) -> &'static str {
        "all_realms_successful"
    }

    #[tracing::instrument(skip_all, fields(strategy = self.name(), realms = attempt.realms().len()))]
    fn execute(&self, attempt: &AuthenticationAttempt) -> Result<Account, AuthenticationError> {
        ensure_realms(attempt)?;

        let token = attempt.token();
        let mut merged = Account::default();

        for realm in attempt.realms() {
            if !realm.supports(token) {
                return Err(AuthenticationError::UnsupportedToken {
                    realm: realm.name().to_owned(),
                });
            }
            let account = consult(realm, token).map_err(|source| AuthenticationError::Realm {
                realm: realm.name().to_owned(),
                source,
            })?;
            merged.merge(realm.name(), account);
        }

        Ok(merged)
    }
}

fn ensure_realms(attempt: &AuthenticationAttempt) -> Result<(), AuthenticationError> {
    if attempt.has_realms() {
        Ok(())
    } else {
        Err(AuthenticationError::NoRealmsConfigured)
    }
}

fn consult(realm: &Arc<dyn Realm>, token: &dyn AuthenticationToken) -> Result<Account, RealmError> {
    debug!(realm = %realm.name(), principal = %token.principal(), "consulting realm");
    realm.authenticate_account(token)
}
