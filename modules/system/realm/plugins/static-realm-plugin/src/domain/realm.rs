//! Configuration-driven realm.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use authz_sdk::{IndexedAuthorizationInfo, SimpleRole};
use realm_sdk::{
    AccountCacheAware, AuthorizingRealm, Cache, CacheManager, PasswordService,
    PermissionResolverAware, Realm, RealmError,
};
use tracing::{debug, info, warn};
use warden_security::{
    Account, AuthenticationToken, IdentifierCollection, Permission, PermissionResolver,
    UsernamePasswordToken, WildcardPermissionResolver,
};

use crate::config::{AccountConfig, StaticRealmConfig};
use crate::domain::password::SaltedSha256PasswordService;

const CACHE_PREFIX: &str = "static_realm_authorization";

/// Each realm gets its own cache so account ids may repeat across realms.
fn cache_name(realm: &str) -> String {
    format!("{CACHE_PREFIX}:{realm}")
}

/// Realm serving the accounts, roles and permissions of a [`StaticRealmConfig`].
///
/// Permission strings are resolved with the currently injected
/// [`PermissionResolver`] each time authorization info is built, so
/// replacing the resolver also evicts cached info.
pub struct StaticRealm {
    name: String,
    accounts_by_username: BTreeMap<String, AccountConfig>,
    usernames_by_id: BTreeMap<String, String>,
    roles: BTreeMap<String, Vec<String>>,
    cache_accounts: bool,
    password_service: Arc<dyn PasswordService>,
    resolver: ArcSwap<Arc<dyn PermissionResolver>>,
    cache: ArcSwapOption<Arc<dyn Cache>>,
}

impl StaticRealm {
    /// Build a realm from configuration, hashing with [`SaltedSha256PasswordService`].
    #[must_use]
    pub fn from_config(cfg: &StaticRealmConfig) -> Self {
        let password_service = Arc::new(SaltedSha256PasswordService::new(cfg.private_salt.clone()));
        Self::with_password_service(cfg, password_service)
    }

    #[must_use]
    pub fn with_password_service(
        cfg: &StaticRealmConfig,
        password_service: Arc<dyn PasswordService>,
    ) -> Self {
        let accounts_by_username: BTreeMap<String, AccountConfig> = cfg
            .accounts
            .iter()
            .map(|a| (a.username.clone(), a.clone()))
            .collect();
        let usernames_by_id = cfg
            .accounts
            .iter()
            .map(|a| (a.account_id().to_owned(), a.username.clone()))
            .collect();
        let roles = cfg
            .roles
            .iter()
            .map(|r| (r.name.clone(), r.permissions.clone()))
            .collect();

        info!(
            realm = %cfg.name,
            accounts = accounts_by_username.len(),
            roles = cfg.roles.len(),
            cache_accounts = cfg.cache_accounts,
            "static realm configured"
        );

        Self {
            name: cfg.name.clone(),
            accounts_by_username,
            usernames_by_id,
            roles,
            cache_accounts: cfg.cache_accounts,
            password_service,
            resolver: ArcSwap::from_pointee(
                Arc::new(WildcardPermissionResolver::default()) as Arc<dyn PermissionResolver>
            ),
            cache: ArcSwapOption::from(None),
        }
    }

    /// Only identifiers this realm vouched for, or ones recorded without any
    /// realm, are looked up. Identifiers from other realms are never trusted.
    fn account_for_identifiers(&self, identifiers: &IdentifierCollection) -> Option<&AccountConfig> {
        let account_id = identifiers
            .from_realm(&self.name)
            .first()
            .or_else(|| identifiers.from_realm("").first())?;
        let username = self.usernames_by_id.get(account_id.as_str())?;
        self.accounts_by_username.get(username)
    }

    fn resolve_all<'a>(
        &self,
        resolver: &dyn PermissionResolver,
        permissions: impl IntoIterator<Item = &'a String>,
    ) -> Vec<Permission> {
        permissions
            .into_iter()
            .filter_map(|raw| match resolver.resolve(raw) {
                Ok(permission) => Some(permission),
                Err(e) => {
                    warn!(
                        realm = %self.name,
                        permission = %raw,
                        error = %e,
                        "skipping unresolvable permission"
                    );
                    None
                }
            })
            .collect()
    }

    fn build_authorization_info(&self, account: &AccountConfig) -> IndexedAuthorizationInfo {
        let resolver = self.resolver.load_full();

        let roles: Vec<SimpleRole> = account
            .roles
            .iter()
            .map(|name| {
                let mut role = SimpleRole::new(name.clone());
                match self.roles.get(name) {
                    Some(perms) => role.add_all(self.resolve_all(resolver.as_ref().as_ref(), perms)),
                    None => {
                        warn!(realm = %self.name, role = %name, "account references unknown role");
                    }
                }
                role
            })
            .collect();

        let permissions = self.resolve_all(resolver.as_ref().as_ref(), &account.permissions);

        IndexedAuthorizationInfo::new(roles.clone(), permissions).unwrap_or_else(|e| {
            warn!(
                realm = %self.name,
                error = %e,
                "permission index inconsistent, using roles only"
            );
            let mut info = IndexedAuthorizationInfo::default();
            info.add_role(roles);
            info
        })
    }

    fn authorization_info(&self, account: &AccountConfig) -> IndexedAuthorizationInfo {
        let cache = if self.cache_accounts {
            self.cache.load_full()
        } else {
            None
        };
        let Some(cache) = cache else {
            return self.build_authorization_info(account);
        };

        let key = account.account_id();
        if let Some(cached) = cache.get(key) {
            match serde_json::from_value(cached) {
                Ok(info) => {
                    debug!(realm = %self.name, account_id = %key, "authorization info cache hit");
                    return info;
                }
                Err(e) => {
                    warn!(
                        realm = %self.name,
                        account_id = %key,
                        error = %e,
                        "discarding unreadable cache entry"
                    );
                }
            }
        }

        let info = self.build_authorization_info(account);
        match serde_json::to_value(&info) {
            Ok(value) => cache.put(key, value),
            Err(e) => warn!(realm = %self.name, error = %e, "authorization info not cacheable"),
        }
        info
    }

    fn evict_all(&self) {
        for account_id in self.usernames_by_id.keys() {
            self.clear_cached_account(account_id);
        }
    }
}

impl Realm for StaticRealm {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, token: &dyn AuthenticationToken) -> bool {
        token.kind() == UsernamePasswordToken::KIND
    }

    fn authenticate_account(&self, token: &dyn AuthenticationToken) -> Result<Account, RealmError> {
        if !self.supports(token) {
            return Err(RealmError::UnsupportedToken {
                kind: token.kind().to_owned(),
            });
        }

        let principal = token.principal();
        let stored = self
            .accounts_by_username
            .get(principal)
            .ok_or_else(|| RealmError::AccountNotFound {
                principal: principal.to_owned(),
            })?;

        if stored.locked {
            return Err(RealmError::LockedAccount {
                principal: principal.to_owned(),
            });
        }

        if !self
            .password_service
            .passwords_match(token.credentials(), &stored.password_hash)
        {
            debug!(realm = %self.name, principal = %principal, "password mismatch");
            return Err(RealmError::IncorrectCredentials {
                principal: principal.to_owned(),
            });
        }

        let account = stored.attributes.iter().fold(
            Account::new(stored.account_id()).with_credential("password", stored.password_hash.clone()),
            |account, (key, value)| account.with_attribute(key.clone(), value.clone()),
        );
        Ok(account)
    }

    fn as_authorizing(&self) -> Option<&dyn AuthorizingRealm> {
        Some(self)
    }

    fn as_permission_resolver_aware(&self) -> Option<&dyn PermissionResolverAware> {
        Some(self)
    }

    fn as_account_cache_aware(&self) -> Option<&dyn AccountCacheAware> {
        Some(self)
    }
}

impl AuthorizingRealm for StaticRealm {
    fn is_permitted(
        &self,
        identifiers: &IdentifierCollection,
        permissions: &[String],
    ) -> Vec<(String, bool)> {
        let Some(account) = self.account_for_identifiers(identifiers) else {
            return permissions.iter().map(|p| (p.clone(), false)).collect();
        };

        let info = self.authorization_info(account);
        let resolver = self.resolver.load_full();
        permissions
            .iter()
            .map(|raw| {
                let granted = match resolver.resolve(raw) {
                    Ok(requested) => info.implies(&requested),
                    Err(e) => {
                        warn!(
                            realm = %self.name,
                            permission = %raw,
                            error = %e,
                            "cannot resolve requested permission"
                        );
                        false
                    }
                };
                (raw.clone(), granted)
            })
            .collect()
    }

    fn has_role(&self, identifiers: &IdentifierCollection, role_ids: &[String]) -> Vec<(String, bool)> {
        let info = self
            .account_for_identifiers(identifiers)
            .map(|account| self.authorization_info(account));
        role_ids
            .iter()
            .map(|role| {
                let held = info.as_ref().is_some_and(|i| i.has_role(role));
                (role.clone(), held)
            })
            .collect()
    }
}

impl PermissionResolverAware for StaticRealm {
    fn set_permission_resolver(&self, resolver: Arc<dyn PermissionResolver>) {
        self.resolver.store(Arc::new(resolver));
        self.evict_all();
        debug!(realm = %self.name, "permission resolver replaced");
    }
}

impl AccountCacheAware for StaticRealm {
    fn set_cache_manager(&self, manager: Arc<dyn CacheManager>) {
        let name = cache_name(&self.name);
        self.cache.store(Some(Arc::new(manager.get_cache(&name))));
        debug!(realm = %self.name, cache = %name, "cache manager set");
    }

    fn clear_cached_account(&self, account_id: &str) {
        let Some(cache) = self.cache.load_full() else {
            return;
        };
        // Nothing cached for this account is fine.
        if cache.remove(account_id).is_ok() {
            debug!(realm = %self.name, account_id = %account_id, "cached account cleared");
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::config::RoleConfig;
    use crate::domain::cache::InMemoryCacheManager;

    fn hash(password: &str) -> String {
        SaltedSha256PasswordService::new(SecretString::from("pepper".to_owned()))
            .hash_password(&SecretString::from(password.to_owned()))
    }

    fn config() -> StaticRealmConfig {
        StaticRealmConfig {
            name: "corp".to_owned(),
            private_salt: SecretString::from("pepper".to_owned()),
            cache_accounts: true,
            roles: vec![RoleConfig {
                name: "auditor".to_owned(),
                permissions: vec!["ledger:read".to_owned(), "report:read,export".to_owned()],
            }],
            accounts: vec![
                AccountConfig {
                    username: "jsmith".to_owned(),
                    account_id: Some("12345".to_owned()),
                    password_hash: hash("secret"),
                    locked: false,
                    roles: vec!["auditor".to_owned(), "ghost".to_owned()],
                    permissions: vec!["Ledger:Write:2024".to_owned(), "::".to_owned()],
                    attributes: BTreeMap::from([(
                        "email".to_owned(),
                        serde_json::json!("jsmith@example.com"),
                    )]),
                },
                AccountConfig {
                    username: "locked".to_owned(),
                    account_id: None,
                    password_hash: hash("secret"),
                    locked: true,
                    roles: Vec::new(),
                    permissions: Vec::new(),
                    attributes: BTreeMap::new(),
                },
            ],
        }
    }

    fn ids() -> IdentifierCollection {
        IdentifierCollection::for_realm("corp", "12345")
    }

    fn items(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn authenticates_with_correct_password() {
        let realm = StaticRealm::from_config(&config());
        let account = realm
            .authenticate_account(&UsernamePasswordToken::new("jsmith", "secret"))
            .unwrap();

        assert_eq!(account.account_id().as_str(), "12345");
        assert_eq!(
            account.attributes()["email"],
            serde_json::json!("jsmith@example.com")
        );
        assert!(account.credentials().contains_key("password"));
    }

    #[test]
    fn rejects_wrong_password_unknown_user_and_locked_account() {
        let realm = StaticRealm::from_config(&config());

        assert!(matches!(
            realm.authenticate_account(&UsernamePasswordToken::new("jsmith", "nope")),
            Err(RealmError::IncorrectCredentials { .. })
        ));
        assert!(matches!(
            realm.authenticate_account(&UsernamePasswordToken::new("nobody", "secret")),
            Err(RealmError::AccountNotFound { .. })
        ));
        assert!(matches!(
            realm.authenticate_account(&UsernamePasswordToken::new("locked", "secret")),
            Err(RealmError::LockedAccount { .. })
        ));
    }

    #[test]
    fn permissions_come_from_roles_and_direct_grants() {
        let realm = StaticRealm::from_config(&config());
        let results = realm.is_permitted(
            &ids(),
            &items(&["ledger:read", "report:export:q3", "ledger:write:2024", "ledger:delete", "::"]),
        );

        assert_eq!(
            results,
            vec![
                ("ledger:read".to_owned(), true),
                ("report:export:q3".to_owned(), true),
                ("ledger:write:2024".to_owned(), true),
                ("ledger:delete".to_owned(), false),
                ("::".to_owned(), false),
            ]
        );
    }

    #[test]
    fn unknown_identifiers_are_denied() {
        let realm = StaticRealm::from_config(&config());
        let stranger = IdentifierCollection::for_realm("corp", "99999");
        assert!(!realm.is_permitted_all(&stranger, &items(&["ledger:read"])));
        assert!(!realm.has_all_roles(&stranger, &items(&["auditor"])));
    }

    #[test]
    fn roles_are_reported_per_item() {
        let realm = StaticRealm::from_config(&config());
        assert_eq!(
            realm.has_role(&ids(), &items(&["auditor", "admin"])),
            vec![("auditor".to_owned(), true), ("admin".to_owned(), false)]
        );
    }

    #[test]
    fn case_sensitive_resolver_changes_matching() {
        let realm = StaticRealm::from_config(&config());
        realm.set_permission_resolver(Arc::new(WildcardPermissionResolver::new(true)));

        assert!(!realm.is_permitted_all(&ids(), &items(&["ledger:write:2024"])));
        assert!(realm.is_permitted_all(&ids(), &items(&["Ledger:Write:2024"])));
    }

    #[test]
    fn authorization_info_is_cached_and_evicted() {
        let realm = StaticRealm::from_config(&config());
        let manager = Arc::new(InMemoryCacheManager::new());
        realm.set_cache_manager(manager.clone());

        assert!(realm.is_permitted_all(&ids(), &items(&["ledger:read"])));
        let cache = manager.get_cache(&cache_name("corp"));
        assert!(cache.get("12345").is_some());

        realm.clear_cached_account("12345");
        assert!(cache.get("12345").is_none());

        realm.clear_cached_account("12345");
    }

    #[test]
    fn replacing_resolver_evicts_cache() {
        let realm = StaticRealm::from_config(&config());
        let manager = Arc::new(InMemoryCacheManager::new());
        realm.set_cache_manager(manager.clone());
        realm.is_permitted_all(&ids(), &items(&["ledger:read"]));

        realm.set_permission_resolver(Arc::new(WildcardPermissionResolver::default()));
        assert!(manager.get_cache(&cache_name("corp")).get("12345").is_none());
    }

    #[test]
    fn identifiers_from_other_realms_are_not_trusted() {
        let realm = StaticRealm::from_config(&config());
        let foreign = IdentifierCollection::for_realm("partners", "12345");

        assert_eq!(
            realm.is_permitted(&foreign, &items(&["ledger:read"])),
            vec![("ledger:read".to_owned(), false)]
        );
        assert_eq!(
            realm.has_role(&foreign, &items(&["auditor"])),
            vec![("auditor".to_owned(), false)]
        );

        let unnamed = IdentifierCollection::for_realm("", "12345");
        assert!(realm.is_permitted_all(&unnamed, &items(&["ledger:read"])));
    }

    #[test]
    fn cached_case_sensitive_answers_are_stable() {
        let realm = StaticRealm::from_config(&config());
        realm.set_permission_resolver(Arc::new(WildcardPermissionResolver::new(true)));
        realm.set_cache_manager(Arc::new(InMemoryCacheManager::new()));

        let query = items(&["Ledger:Write:2024"]);
        let first = realm.is_permitted(&ids(), &query);
        let second = realm.is_permitted(&ids(), &query);

        assert_eq!(first, vec![("Ledger:Write:2024".to_owned(), true)]);
        assert_eq!(second, first);
    }

    #[test]
    #[tracing_test::traced_test]
    fn unknown_role_is_logged() {
        let realm = StaticRealm::from_config(&config());
        let _ = realm.has_role(&ids(), &items(&["auditor"]));
        assert!(logs_contain("account references unknown role"));
    }

    #[test]
    fn only_username_password_tokens_are_supported() {
        #[derive(Debug)]
        struct ApiKey(SecretString);

        impl AuthenticationToken for ApiKey {
            fn principal(&self) -> &'static str {
                "service"
            }
            fn credentials(&self) -> &SecretString {
                &self.0
            }
            fn kind(&self) -> &'static str {
                "api_key"
            }
        }

        let realm = StaticRealm::from_config(&config());
        let token = ApiKey(SecretString::from("k".to_owned()));
        assert!(!realm.supports(&token));
        assert!(matches!(
            realm.authenticate_account(&token),
            Err(RealmError::UnsupportedToken { .. })
        ));
    }
}
