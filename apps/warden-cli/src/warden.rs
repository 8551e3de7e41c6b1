//! Wires configured realms into an authenticator and an authorizer.

use std::collections::BTreeSet;
use std::sync::Arc;

use authc::ModularRealmAuthenticator;
use authc_sdk::{AuthenticationError, AuthenticatorClient};
use authz::ModularRealmAuthorizer;
use authz_sdk::{AuthorizationError, AuthorizerClient};
use realm_sdk::{CacheManager, Realm};
use secrecy::{ExposeSecret, SecretString};
use static_realm_plugin::{InMemoryCacheManager, StaticRealm};
use tracing::info;
use warden_security::{Account, IdentifierCollection, UsernamePasswordToken};

use crate::config::WardenConfig;

/// Authenticated subject: the merged account and the identifiers used for
/// authorization queries.
#[derive(Debug)]
pub struct Subject {
    pub account: Account,
    pub identifiers: IdentifierCollection,
}

pub struct Warden {
    authenticator: ModularRealmAuthenticator,
    authorizer: ModularRealmAuthorizer,
}

impl Warden {
    #[must_use]
    pub fn from_config(cfg: &WardenConfig) -> Self {
        let cache_manager: Arc<dyn CacheManager> = Arc::new(InMemoryCacheManager::new());
        let realms: Vec<Arc<dyn Realm>> = cfg
            .realms
            .iter()
            .map(|realm_cfg| {
                let realm = StaticRealm::from_config(realm_cfg);
                if realm_cfg.cache_accounts
                    && let Some(cache_aware) = realm.as_account_cache_aware()
                {
                    cache_aware.set_cache_manager(Arc::clone(&cache_manager));
                }
                Arc::new(realm) as Arc<dyn Realm>
            })
            .collect();

        info!(
            realms = realms.len(),
            strategy = %cfg.authc.strategy,
            "warden initialized"
        );

        Self {
            authenticator: ModularRealmAuthenticator::from_config(&cfg.authc, realms.clone()),
            authorizer: ModularRealmAuthorizer::from_config(&cfg.authz, realms),
        }
    }

    /// Authenticate a username/password pair against every configured realm.
    ///
    /// # Errors
    /// Returns the authenticator's error when the strategy rejects the attempt.
    pub fn login(&self, username: &str, password: &SecretString) -> Result<Subject, AuthenticationError> {
        let token = UsernamePasswordToken::new(username, password.expose_secret());
        let account = self.authenticator.authenticate_account(Box::new(token))?;
        let identifiers = account.identifiers();
        Ok(Subject {
            account,
            identifiers,
        })
    }

    /// Per-item permission decisions for `subject`.
    ///
    /// # Errors
    /// Returns [`AuthorizationError::RealmsNotConfigured`] without realms.
    pub fn permissions(
        &self,
        subject: &Subject,
        permissions: &[String],
    ) -> Result<BTreeSet<(String, bool)>, AuthorizationError> {
        self.authorizer.is_permitted(&subject.identifiers, permissions)
    }

    /// Per-item role decisions for `subject`.
    ///
    /// # Errors
    /// Returns [`AuthorizationError::RealmsNotConfigured`] without realms.
    pub fn roles(
        &self,
        subject: &Subject,
        role_ids: &[String],
    ) -> Result<BTreeSet<(String, bool)>, AuthorizationError> {
        self.authorizer.has_role(&subject.identifiers, role_ids)
    }
}
