//! Modular realm authenticator.

use std::sync::Arc;

use authc_sdk::{AuthenticationAttempt, AuthenticationError, AuthenticatorClient};
use realm_sdk::Realm;
use tracing::{info, warn};
use warden_security::{Account, AuthenticationToken};

use crate::config::AuthcConfig;
use crate::domain::strategy::AuthenticationStrategy;

/// Authenticates tokens against a list of realms.
///
/// With a single realm the realm is consulted directly and its failure is
/// reported as-is. With several realms the configured strategy decides.
pub struct ModularRealmAuthenticator {
    realms: Vec<Arc<dyn Realm>>,
    strategy: Arc<dyn AuthenticationStrategy>,
}

impl ModularRealmAuthenticator {
    #[must_use]
    pub fn new(strategy: Arc<dyn AuthenticationStrategy>) -> Self {
        Self {
            realms: Vec::new(),
            strategy,
        }
    }

    /// Create an authenticator using the strategy named in `cfg`.
    #[must_use]
    pub fn from_config(cfg: &AuthcConfig, realms: impl IntoIterator<Item = Arc<dyn Realm>>) -> Self {
        info!(strategy = %cfg.strategy, "configuring authenticator");
        let mut authenticator = Self::new(cfg.strategy.build());
        authenticator.set_realms(realms);
        authenticator
    }

    #[must_use]
    pub fn with_realms(mut self, realms: impl IntoIterator<Item = Arc<dyn Realm>>) -> Self {
        self.set_realms(realms);
        self
    }

    /// Replace the realm list.
    pub fn set_realms(&mut self, realms: impl IntoIterator<Item = Arc<dyn Realm>>) {
        self.realms = realms.into_iter().collect();
        info!(realms = self.realms.len(), "authentication realms set");
    }

    #[must_use]
    pub fn realms(&self) -> &[Arc<dyn Realm>] {
        &self.realms
    }

    #[must_use]
    pub fn strategy(&self) -> &dyn AuthenticationStrategy {
        self.strategy.as_ref()
    }

    fn authenticate_single_realm(
        realm: &Arc<dyn Realm>,
        token: &dyn AuthenticationToken,
    ) -> Result<Account, AuthenticationError> {
        if !realm.supports(token) {
            return Err(AuthenticationError::UnsupportedToken {
                realm: realm.name().to_owned(),
            });
        }
        let account = realm
            .authenticate_account(token)
            .map_err(|source| AuthenticationError::Realm {
                realm: realm.name().to_owned(),
                source,
            })?;
        let mut merged = Account::default();
        merged.merge(realm.name(), account);
        Ok(merged)
    }
}

impl AuthenticatorClient for ModularRealmAuthenticator {
    #[tracing::instrument(skip_all, fields(strategy = self.strategy.name(), realms = self.realms.len()))]
    fn authenticate_account(
        &self,
        token: Box<dyn AuthenticationToken>,
    ) -> Result<Account, AuthenticationError> {
        let principal = token.principal().to_owned();

        let result = match self.realms.as_slice() {
            [] => Err(AuthenticationError::NoRealmsConfigured),
            [realm] => Self::authenticate_single_realm(realm, token.as_ref()),
            realms => {
                let attempt = AuthenticationAttempt::new(token, realms.iter().cloned());
                self.strategy.execute(&attempt)
            }
        };

        match &result {
            Ok(account) => info!(
                principal = %principal,
                account_id = %account.account_id(),
                "authentication succeeded"
            ),
            Err(e) => warn!(principal = %principal, error = %e, "authentication failed"),
        }
        result
    }
}
