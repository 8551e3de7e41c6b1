//! Realm capability traits.
//!
//! Every realm implements [`Realm`]. The optional capabilities are separate
//! traits; a realm advertises them by overriding the matching `as_*`
//! accessor so callers can discover them through a `dyn Realm`.

use std::sync::Arc;

use warden_security::{Account, AuthenticationToken, IdentifierCollection, PermissionResolver};

use crate::cache::CacheManager;
use crate::error::RealmError;

/// A source of authentication decisions, optionally also of authorization
/// decisions.
pub trait Realm: Send + Sync {
    /// Unique name of this realm. Used as the key for identifiers it vouches for.
    fn name(&self) -> &str;

    /// Whether this realm can authenticate `token`.
    fn supports(&self, _token: &dyn AuthenticationToken) -> bool {
        true
    }

    /// Look up and verify the account for `token`.
    ///
    /// # Errors
    ///
    /// - `IncorrectCredentials` if the credentials do not match
    /// - `AccountNotFound` if the principal is unknown
    /// - `LockedAccount` if the account may not log in
    /// - `UnsupportedToken` if the token kind is not handled
    /// - `Internal` for unexpected failures
    fn authenticate_account(&self, token: &dyn AuthenticationToken) -> Result<Account, RealmError>;

    fn as_authorizing(&self) -> Option<&dyn AuthorizingRealm> {
        None
    }

    fn as_permission_resolver_aware(&self) -> Option<&dyn PermissionResolverAware> {
        None
    }

    fn as_account_cache_aware(&self) -> Option<&dyn AccountCacheAware> {
        None
    }
}

/// Answers permission and role checks for identifiers this realm knows.
///
/// Results are per item: one `(item, granted)` pair for every requested
/// item, in request order. Identifiers the realm does not recognise yield
/// `false` for every item.
pub trait AuthorizingRealm: Send + Sync {
    fn is_permitted(
        &self,
        identifiers: &IdentifierCollection,
        permissions: &[String],
    ) -> Vec<(String, bool)>;

    fn has_role(&self, identifiers: &IdentifierCollection, role_ids: &[String]) -> Vec<(String, bool)>;

    fn is_permitted_all(&self, identifiers: &IdentifierCollection, permissions: &[String]) -> bool {
        self.is_permitted(identifiers, permissions)
            .iter()
            .all(|(_, granted)| *granted)
    }

    fn has_all_roles(&self, identifiers: &IdentifierCollection, role_ids: &[String]) -> bool {
        self.has_role(identifiers, role_ids)
            .iter()
            .all(|(_, granted)| *granted)
    }
}

/// Accepts the resolver used to turn stored permission strings into
/// permissions. Called again whenever the resolver is replaced.
pub trait PermissionResolverAware: Send + Sync {
    fn set_permission_resolver(&self, resolver: Arc<dyn PermissionResolver>);
}

/// Accepts a cache manager and supports evicting cached account data.
pub trait AccountCacheAware: Send + Sync {
    fn set_cache_manager(&self, manager: Arc<dyn CacheManager>);

    /// Drop anything cached for `account_id`. Absent entries are not an error.
    fn clear_cached_account(&self, account_id: &str);
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use warden_security::UsernamePasswordToken;

    use super::*;

    struct GrantListRealm {
        granted: Vec<String>,
    }

    impl Realm for GrantListRealm {
        fn name(&self) -> &'static str {
            "grant_list"
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

    impl AuthorizingRealm for GrantListRealm {
        fn is_permitted(
            &self,
            _identifiers: &IdentifierCollection,
            permissions: &[String],
        ) -> Vec<(String, bool)> {
            permissions
                .iter()
                .map(|p| (p.clone(), self.granted.contains(p)))
                .collect()
        }

        fn has_role(
            &self,
            _identifiers: &IdentifierCollection,
            role_ids: &[String],
        ) -> Vec<(String, bool)> {
            role_ids.iter().map(|r| (r.clone(), false)).collect()
        }
    }

    #[test]
    fn capabilities_default_to_absent() {
        struct Bare;
        impl Realm for Bare {
            fn name(&self) -> &'static str {
                "bare"
            }
            fn authenticate_account(
                &self,
                _token: &dyn AuthenticationToken,
            ) -> Result<Account, RealmError> {
                Ok(Account::new("1"))
            }
        }

        let realm: &dyn Realm = &Bare;
        let token = UsernamePasswordToken::new("user", "secret");
        assert!(realm.supports(&token));
        assert!(realm.as_authorizing().is_none());
        assert!(realm.as_permission_resolver_aware().is_none());
        assert!(realm.as_account_cache_aware().is_none());
    }

    #[test]
    fn all_variants_fold_per_item_results() {
        let realm = GrantListRealm {
            granted: vec!["doc:read".to_owned()],
        };
        let authz = (&realm as &dyn Realm).as_authorizing().unwrap();
        let ids = IdentifierCollection::for_realm("grant_list", "1");

        assert!(authz.is_permitted_all(&ids, &["doc:read".to_owned()]));
        assert!(!authz.is_permitted_all(
            &ids,
            &["doc:read".to_owned(), "doc:write".to_owned()]
        ));
        assert!(!authz.has_all_roles(&ids, &["admin".to_owned()]));
    }
}
