use crate::permission::{Permission, PermissionParseError};

/// Turns permission strings into [`Permission`] values.
///
/// Realms that store permissions as strings hold one of these and use it
/// whenever they compare stored grants against a request.
pub trait PermissionResolver: Send + Sync {
    /// Resolve a single permission string.
    ///
    /// # Errors
    ///
    /// Returns [`PermissionParseError`] if the string is not a valid
    /// wildcard permission.
    fn resolve(&self, permission: &str) -> Result<Permission, PermissionParseError>;
}

/// Resolver producing wildcard permissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WildcardPermissionResolver {
    case_sensitive: bool,
}

impl WildcardPermissionResolver {
    #[must_use]
    pub fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    #[must_use]
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

impl PermissionResolver for WildcardPermissionResolver {
    fn resolve(&self, permission: &str) -> Result<Permission, PermissionParseError> {
        Permission::parse_with(permission, self.case_sensitive)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn default_resolver_is_case_insensitive() {
        let resolver = WildcardPermissionResolver::default();
        assert!(!resolver.case_sensitive());
        assert_eq!(
            resolver.resolve("Doc:Read").unwrap(),
            Permission::parse("doc:read").unwrap()
        );
    }

    #[test]
    fn case_sensitive_resolver_keeps_case() {
        let resolver = WildcardPermissionResolver::new(true);
        let p = resolver.resolve("Doc:Read").unwrap();
        assert!(p.domain().contains("Doc"));
    }

    #[test]
    fn resolver_reports_parse_errors() {
        let resolver = WildcardPermissionResolver::default();
        assert_eq!(resolver.resolve(""), Err(PermissionParseError::Empty));
    }
}
