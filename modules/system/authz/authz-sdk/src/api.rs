//! Public API trait for warden authorization.

use std::collections::BTreeSet;

use warden_security::IdentifierCollection;

use crate::error::AuthorizationError;

/// Permission and role checks for a subject identified by `identifiers`.
///
/// Per-item answers combine across realms with OR: one realm granting an
/// item is enough. The `*_all` and `check_*` variants then require every
/// item to be granted.
///
/// ```ignore
/// let results = authorizer.is_permitted(&ids, &perms)?;
/// authorizer.check_role(&ids, &["admin".to_owned()])?;
/// ```
pub trait AuthorizerClient: Send + Sync {
    /// One `(permission, granted)` entry per requested permission.
    ///
    /// # Errors
    ///
    /// - `RealmsNotConfigured` if no realms are registered
    fn is_permitted(
        &self,
        identifiers: &IdentifierCollection,
        permissions: &[String],
    ) -> Result<BTreeSet<(String, bool)>, AuthorizationError>;

    /// Whether every requested permission is granted.
    ///
    /// # Errors
    ///
    /// - `RealmsNotConfigured` if no realms are registered
    fn is_permitted_all(
        &self,
        identifiers: &IdentifierCollection,
        permissions: &[String],
    ) -> Result<bool, AuthorizationError>;

    /// Succeeds only if every requested permission is granted.
    ///
    /// # Errors
    ///
    /// - `RealmsNotConfigured` if no realms are registered
    /// - `Unauthorized` if any permission is denied
    fn check_permission(
        &self,
        identifiers: &IdentifierCollection,
        permissions: &[String],
    ) -> Result<(), AuthorizationError>;

    /// One `(role, held)` entry per requested role.
    ///
    /// # Errors
    ///
    /// - `RealmsNotConfigured` if no realms are registered
    fn has_role(
        &self,
        identifiers: &IdentifierCollection,
        role_ids: &[String],
    ) -> Result<BTreeSet<(String, bool)>, AuthorizationError>;

    /// Whether every requested role is held.
    ///
    /// # Errors
    ///
    /// - `RealmsNotConfigured` if no realms are registered
    fn has_all_roles(
        &self,
        identifiers: &IdentifierCollection,
        role_ids: &[String],
    ) -> Result<bool, AuthorizationError>;

    /// Succeeds only if every requested role is held.
    ///
    /// # Errors
    ///
    /// - `RealmsNotConfigured` if no realms are registered
    /// - `Unauthorized` if any role is missing
    fn check_role(
        &self,
        identifiers: &IdentifierCollection,
        role_ids: &[String],
    ) -> Result<(), AuthorizationError>;
}
