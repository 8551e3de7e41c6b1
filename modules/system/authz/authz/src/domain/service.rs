//! Modular realm authorizer.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use authz_sdk::{AuthorizationError, AuthorizerClient};
use realm_sdk::{AuthorizingRealm, Realm};
use tracing::{debug, info, warn};
use warden_security::{IdentifierCollection, PermissionResolver, WildcardPermissionResolver};

use crate::config::AuthzConfig;

/// Answers permission and role checks by asking every authorizing realm.
///
/// For each requested item the answers of all realms are OR-ed: a single
/// realm granting an item is enough. Realms that only authenticate are
/// skipped. Query results do not depend on realm order.
///
/// Replacing the realms or the permission resolver re-applies the resolver
/// to every realm that accepts one. Both setters take `&mut self`, so they
/// cannot race with queries on a shared authorizer.
pub struct ModularRealmAuthorizer {
    realms: Vec<Arc<dyn Realm>>,
    permission_resolver: Option<Arc<dyn PermissionResolver>>,
}

impl Default for ModularRealmAuthorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ModularRealmAuthorizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            realms: Vec::new(),
            permission_resolver: None,
        }
    }

    /// Create an authorizer with a wildcard resolver configured from `cfg`.
    #[must_use]
    pub fn from_config(cfg: &AuthzConfig, realms: impl IntoIterator<Item = Arc<dyn Realm>>) -> Self {
        let mut authorizer = Self::new();
        authorizer.set_permission_resolver(Arc::new(WildcardPermissionResolver::new(
            cfg.case_sensitive,
        )));
        authorizer.set_realms(realms);
        authorizer
    }

    #[must_use]
    pub fn with_realms(mut self, realms: impl IntoIterator<Item = Arc<dyn Realm>>) -> Self {
        self.set_realms(realms);
        self
    }

    #[must_use]
    pub fn with_permission_resolver(mut self, resolver: Arc<dyn PermissionResolver>) -> Self {
        self.set_permission_resolver(resolver);
        self
    }

    #[must_use]
    pub fn realms(&self) -> &[Arc<dyn Realm>] {
        &self.realms
    }

    /// Replace the realms and hand them the current permission resolver.
    pub fn set_realms(&mut self, realms: impl IntoIterator<Item = Arc<dyn Realm>>) {
        self.realms = realms.into_iter().collect();
        info!(realms = self.realms.len(), "authorization realms set");
        self.apply_permission_resolver_to_realms();
    }

    #[must_use]
    pub fn permission_resolver(&self) -> Option<&Arc<dyn PermissionResolver>> {
        self.permission_resolver.as_ref()
    }

    /// Replace the permission resolver and hand it to every realm that accepts one.
    pub fn set_permission_resolver(&mut self, resolver: Arc<dyn PermissionResolver>) {
        self.permission_resolver = Some(resolver);
        self.apply_permission_resolver_to_realms();
    }

    fn apply_permission_resolver_to_realms(&self) {
        let Some(resolver) = &self.permission_resolver else {
            return;
        };

        let mut applied = 0_usize;
        for aware in self
            .realms
            .iter()
            .filter_map(|realm| realm.as_permission_resolver_aware())
        {
            aware.set_permission_resolver(Arc::clone(resolver));
            applied += 1;
        }
        if applied > 0 {
            info!(realms = applied, "permission resolver applied to realms");
        }
    }

    /// # Errors
    ///
    /// Returns [`AuthorizationError::RealmsNotConfigured`] if no realms are set.
    pub fn assert_realms_configured(&self) -> Result<(), AuthorizationError> {
        if self.realms.is_empty() {
            warn!("authorization requested with no realms configured");
            return Err(AuthorizationError::RealmsNotConfigured);
        }
        Ok(())
    }

    /// Registered realms that answer authorization queries.
    pub fn authorizing_realms(&self) -> impl Iterator<Item = &dyn AuthorizingRealm> + '_ {
        self.realms.iter().filter_map(|realm| realm.as_authorizing())
    }

    fn permission_results(
        &self,
        identifiers: &IdentifierCollection,
        permissions: &[String],
    ) -> BTreeSet<(String, bool)> {
        let answers = self
            .authorizing_realms()
            .flat_map(|realm| realm.is_permitted(identifiers, permissions));
        any_realm_grants(permissions, answers)
    }

    fn role_results(
        &self,
        identifiers: &IdentifierCollection,
        role_ids: &[String],
    ) -> BTreeSet<(String, bool)> {
        let answers = self
            .authorizing_realms()
            .flat_map(|realm| realm.has_role(identifiers, role_ids));
        any_realm_grants(role_ids, answers)
    }

    fn permitted_all(&self, identifiers: &IdentifierCollection, permissions: &[String]) -> bool {
        all_granted(&self.permission_results(identifiers, permissions))
    }

    fn holds_all_roles(&self, identifiers: &IdentifierCollection, role_ids: &[String]) -> bool {
        all_granted(&self.role_results(identifiers, role_ids))
    }
}

/// OR the per-realm answers for each requested item. Items no realm spoke
/// about are denied; answers about items that were not requested are ignored.
fn any_realm_grants(
    requested: &[String],
    answers: impl IntoIterator<Item = (String, bool)>,
) -> BTreeSet<(String, bool)> {
    let mut granted: BTreeMap<&str, bool> = requested.iter().map(|item| (item.as_str(), false)).collect();
    for (item, answer) in answers {
        if let Some(slot) = granted.get_mut(item.as_str()) {
            *slot |= answer;
        }
    }
    granted
        .into_iter()
        .map(|(item, answer)| (item.to_owned(), answer))
        .collect()
}

fn all_granted(results: &BTreeSet<(String, bool)>) -> bool {
    results.iter().all(|(_, granted)| *granted)
}

impl AuthorizerClient for ModularRealmAuthorizer {
    #[tracing::instrument(skip_all, fields(permissions = permissions.len()))]
    fn is_permitted(
        &self,
        identifiers: &IdentifierCollection,
        permissions: &[String],
    ) -> Result<BTreeSet<(String, bool)>, AuthorizationError> {
        self.assert_realms_configured()?;
        Ok(self.permission_results(identifiers, permissions))
    }

    #[tracing::instrument(skip_all, fields(permissions = permissions.len()))]
    fn is_permitted_all(
        &self,
        identifiers: &IdentifierCollection,
        permissions: &[String],
    ) -> Result<bool, AuthorizationError> {
        self.assert_realms_configured()?;
        Ok(self.permitted_all(identifiers, permissions))
    }

    /// Decides like `is_permitted_all` but shares its evaluation instead of
    /// calling it, so the realm assertion still runs once.
    #[tracing::instrument(skip_all, fields(permissions = permissions.len()))]
    fn check_permission(
        &self,
        identifiers: &IdentifierCollection,
        permissions: &[String],
    ) -> Result<(), AuthorizationError> {
        self.assert_realms_configured()?;
        if self.permitted_all(identifiers, permissions) {
            Ok(())
        } else {
            debug!(subject = ?identifiers.primary_identifier(), "permission check denied");
            Err(AuthorizationError::Unauthorized)
        }
    }

    #[tracing::instrument(skip_all, fields(roles = role_ids.len()))]
    fn has_role(
        &self,
        identifiers: &IdentifierCollection,
        role_ids: &[String],
    ) -> Result<BTreeSet<(String, bool)>, AuthorizationError> {
        self.assert_realms_configured()?;
        Ok(self.role_results(identifiers, role_ids))
    }

    #[tracing::instrument(skip_all, fields(roles = role_ids.len()))]
    fn has_all_roles(
        &self,
        identifiers: &IdentifierCollection,
        role_ids: &[String],
    ) -> Result<bool, AuthorizationError> {
        self.assert_realms_configured()?;
        Ok(self.holds_all_roles(identifiers, role_ids))
    }

    /// Decides like `has_all_roles` but shares its evaluation instead of
    /// calling it, so the realm assertion still runs once.
    #[tracing::instrument(skip_all, fields(roles = role_ids.len()))]
    fn check_role(
        &self,
        identifiers: &IdentifierCollection,
        role_ids: &[String],
    ) -> Result<(), AuthorizationError> {
        self.assert_realms_configured()?;
        if self.holds_all_roles(identifiers, role_ids) {
            Ok(())
        } else {
            debug!(subject = ?identifiers.primary_identifier(), "role check denied");
            Err(AuthorizationError::Unauthorized)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use realm_sdk::RealmError;
    use warden_security::{Account, AuthenticationToken};

    use super::*;

    /// Grants every item listed in `grants`, denies the rest.
    struct ListRealm {
        name: &'static str,
        grants: Vec<&'static str>,
    }

    impl Realm for ListRealm {
        fn name(&self) -> &'static str {
            self.name
        }

        fn authenticate_account(
            &self,
            token: &dyn AuthenticationToken,
        ) -> Result<Account, RealmError> {
            Err(RealmError::AccountNotFound {
                principal: token.principal().to_owned(),
            })
        }

        fn as_authorizing(&self) -> Option<&dyn AuthorizingRealm> {
            Some(self)
        }
    }

    impl AuthorizingRealm for ListRealm {
        fn is_permitted(
            &self,
            _identifiers: &IdentifierCollection,
            permissions: &[String],
        ) -> Vec<(String, bool)> {
            permissions
                .iter()
                .map(|p| (p.clone(), self.grants.contains(&p.as_str())))
                .collect()
        }

        fn has_role(
            &self,
            identifiers: &IdentifierCollection,
            role_ids: &[String],
        ) -> Vec<(String, bool)> {
            self.is_permitted(identifiers, role_ids)
        }
    }

    fn authorizer(grants: &[Vec<&'static str>]) -> ModularRealmAuthorizer {
        let realms = grants.iter().enumerate().map(|(n, g)| {
            let name: &'static str = ["realm1", "realm2", "realm3"][n % 3];
            Arc::new(ListRealm {
                name,
                grants: g.clone(),
            }) as Arc<dyn Realm>
        });
        ModularRealmAuthorizer::new().with_realms(realms)
    }

    fn items(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn ids() -> IdentifierCollection {
        IdentifierCollection::for_realm("realm1", "thedude")
    }

    #[test]
    fn any_realm_grants_ors_answers_per_item() {
        let results = any_realm_grants(
            &items(&["p1", "p2", "p3"]),
            [
                ("p1".to_owned(), false),
                ("p1".to_owned(), true),
                ("p2".to_owned(), false),
                ("p9".to_owned(), true),
            ],
        );
        let expected: BTreeSet<(String, bool)> = [
            ("p1".to_owned(), true),
            ("p2".to_owned(), false),
            ("p3".to_owned(), false),
        ]
        .into_iter()
        .collect();
        assert_eq!(results, expected);
    }

    struct CountingRealm {
        queries: AtomicUsize,
    }

    impl Realm for CountingRealm {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn authenticate_account(
            &self,
            _token: &dyn AuthenticationToken,
        ) -> Result<Account, RealmError> {
            Ok(Account::new("counted"))
        }

        fn as_authorizing(&self) -> Option<&dyn AuthorizingRealm> {
            Some(self)
        }
    }

    impl AuthorizingRealm for CountingRealm {
        fn is_permitted(
            &self,
            _identifiers: &IdentifierCollection,
            permissions: &[String],
        ) -> Vec<(String, bool)> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            permissions.iter().map(|p| (p.clone(), true)).collect()
        }

        fn has_role(
            &self,
            identifiers: &IdentifierCollection,
            role_ids: &[String],
        ) -> Vec<(String, bool)> {
            self.is_permitted(identifiers, role_ids)
        }
    }

    #[test]
    fn every_query_consults_each_realm_once() {
        let realm = Arc::new(CountingRealm {
            queries: AtomicUsize::new(0),
        });
        let authz =
            ModularRealmAuthorizer::new().with_realms([Arc::clone(&realm) as Arc<dyn Realm>]);
        let perms = items(&["p1"]);
        let roles = items(&["role1"]);

        authz.is_permitted(&ids(), &perms).unwrap();
        authz.is_permitted_all(&ids(), &perms).unwrap();
        authz.check_permission(&ids(), &perms).unwrap();
        authz.has_role(&ids(), &roles).unwrap();
        authz.has_all_roles(&ids(), &roles).unwrap();
        authz.check_role(&ids(), &roles).unwrap();

        assert_eq!(realm.queries.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn unconfigured_authorizer_fails_every_query() {
        let authz = ModularRealmAuthorizer::new();
        let perms = items(&["p1"]);

        assert_eq!(
            authz.is_permitted(&ids(), &perms),
            Err(AuthorizationError::RealmsNotConfigured)
        );
        assert_eq!(
            authz.is_permitted_all(&ids(), &perms),
            Err(AuthorizationError::RealmsNotConfigured)
        );
        assert_eq!(
            authz.check_permission(&ids(), &perms),
            Err(AuthorizationError::RealmsNotConfigured)
        );
        assert_eq!(
            authz.has_role(&ids(), &perms),
            Err(AuthorizationError::RealmsNotConfigured)
        );
        assert_eq!(
            authz.has_all_roles(&ids(), &perms),
            Err(AuthorizationError::RealmsNotConfigured)
        );
        assert_eq!(
            authz.check_role(&ids(), &perms),
            Err(AuthorizationError::RealmsNotConfigured)
        );
    }

    #[test]
    #[tracing_test::traced_test]
    fn every_query_asserts_realms_exactly_once() {
        let authz = ModularRealmAuthorizer::new();
        let perms = items(&["p1"]);

        assert!(authz.is_permitted(&ids(), &perms).is_err());
        assert!(authz.is_permitted_all(&ids(), &perms).is_err());
        assert!(authz.check_permission(&ids(), &perms).is_err());
        assert!(authz.has_role(&ids(), &perms).is_err());
        assert!(authz.has_all_roles(&ids(), &perms).is_err());
        assert!(authz.check_role(&ids(), &perms).is_err());

        logs_assert(|lines: &[&str]| {
            let asserted = lines
                .iter()
                .filter(|line| line.contains("authorization requested with no realms configured"))
                .count();
            if asserted == 6 {
                Ok(())
            } else {
                Err(format!("expected 6 realm assertions, saw {asserted}"))
            }
        });
    }

    #[test]
    fn check_permission_denies_if_any_item_denied() {
        let authz = authorizer(&[vec!["p1"], vec!["p2"], vec![]]);

        assert!(authz.check_permission(&ids(), &items(&["p1", "p2"])).is_ok());
        assert_eq!(
            authz.check_permission(&ids(), &items(&["p1", "p3"])),
            Err(AuthorizationError::Unauthorized)
        );
    }

    #[test]
    fn check_role_mirrors_has_all_roles() {
        let authz = authorizer(&[vec!["role1"], vec!["role2"]]);

        assert!(authz.has_all_roles(&ids(), &items(&["role1", "role2"])).unwrap());
        assert!(authz.check_role(&ids(), &items(&["role1", "role2"])).is_ok());
        assert!(!authz.has_all_roles(&ids(), &items(&["role1", "role3"])).unwrap());
        assert_eq!(
            authz.check_role(&ids(), &items(&["role3"])),
            Err(AuthorizationError::Unauthorized)
        );
    }

    #[test]
    #[tracing_test::traced_test]
    fn missing_realms_are_logged() {
        let authz = ModularRealmAuthorizer::new();
        assert!(authz.assert_realms_configured().is_err());
        assert!(logs_contain("authorization requested with no realms configured"));
    }
}
