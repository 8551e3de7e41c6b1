//! Error types for warden authorization.

use thiserror::Error;
use warden_security::Permission;

/// Errors returned by [`AuthorizerClient`](crate::AuthorizerClient).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// The authorizer has no realms to consult.
    #[error("no realms configured for authorization")]
    RealmsNotConfigured,

    /// A `check_*` call was denied. Which item failed is not disclosed.
    #[error("subject is not authorized")]
    Unauthorized,
}

/// Raised when the permission index does not match the permissions it holds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexingError {
    #[error("permission '{permission}' is not indexed under domain '{domain}'")]
    PermissionNotIndexed { permission: Permission, domain: String },

    /// A stored index lists a permission under a domain it does not govern.
    #[error("permission '{permission}' is misplaced under domain '{domain}'")]
    MisplacedPermission { permission: Permission, domain: String },
}
