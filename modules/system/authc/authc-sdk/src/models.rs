//! Authentication models.

use std::fmt;
use std::sync::Arc;

use realm_sdk::Realm;
use warden_security::AuthenticationToken;

/// A token together with the realms that should judge it.
///
/// The attempt owns its token and shares its realms. Realms are kept in the
/// order given, with repeated instances (the same `Arc` target) dropped, so
/// "first realm" is well defined for strategies that need it.
pub struct AuthenticationAttempt {
    token: Box<dyn AuthenticationToken>,
    realms: Vec<Arc<dyn Realm>>,
}

impl AuthenticationAttempt {
    #[must_use]
    pub fn new(
        token: Box<dyn AuthenticationToken>,
        realms: impl IntoIterator<Item = Arc<dyn Realm>>,
    ) -> Self {
        let mut unique: Vec<Arc<dyn Realm>> = Vec::new();
        for realm in realms {
            if !unique.iter().any(|known| same_realm(known, &realm)) {
                unique.push(realm);
            }
        }
        Self {
            token,
            realms: unique,
        }
    }

    #[must_use]
    pub fn token(&self) -> &dyn AuthenticationToken {
        self.token.as_ref()
    }

    #[must_use]
    pub fn realms(&self) -> &[Arc<dyn Realm>] {
        &self.realms
    }

    #[must_use]
    pub fn has_realms(&self) -> bool {
        !self.realms.is_empty()
    }
}

impl fmt::Debug for AuthenticationAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationAttempt")
            .field("token", &self.token)
            .field(
                "realms",
                &self.realms.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn same_realm(a: &Arc<dyn Realm>, b: &Arc<dyn Realm>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use realm_sdk::RealmError;
    use warden_security::{Account, UsernamePasswordToken};

    use super::*;

    struct NamedRealm(&'static str);

    impl Realm for NamedRealm {
        fn name(&self) -> &'static str {
            self.0
        }

        fn authenticate_account(
            &self,
            _token: &dyn AuthenticationToken,
        ) -> Result<Account, RealmError> {
            Ok(Account::new(self.0))
        }
    }

    fn token() -> Box<dyn AuthenticationToken> {
        Box::new(UsernamePasswordToken::new("user", "secret").with_host("127.0.0.1"))
    }

    #[test]
    fn attempt_keeps_order_and_drops_repeated_instances() {
        let r1: Arc<dyn Realm> = Arc::new(NamedRealm("realm1"));
        let r2: Arc<dyn Realm> = Arc::new(NamedRealm("realm2"));

        let attempt = AuthenticationAttempt::new(token(), [r1.clone(), r2, r1]);

        let names: Vec<&str> = attempt.realms().iter().map(|r| r.name()).collect();
        assert_eq!(names, ["realm1", "realm2"]);
        assert_eq!(attempt.token().principal(), "user");
    }

    #[test]
    fn distinct_instances_with_same_name_are_kept() {
        let realms: Vec<Arc<dyn Realm>> =
            vec![Arc::new(NamedRealm("realm1")), Arc::new(NamedRealm("realm1"))];
        let attempt = AuthenticationAttempt::new(token(), realms);
        assert_eq!(attempt.realms().len(), 2);
    }

    #[test]
    fn empty_realm_set_is_allowed() {
        let attempt = AuthenticationAttempt::new(token(), Vec::new());
        assert!(!attempt.has_realms());
    }
}
