//! Public API trait for warden authentication.

use warden_security::{Account, AuthenticationToken};

use crate::error::AuthenticationError;

/// Authenticates tokens against the configured realms.
///
/// ```ignore
/// let account = authenticator.authenticate_account(Box::new(token))?;
/// let ids = account.identifiers();
/// ```
pub trait AuthenticatorClient: Send + Sync {
    /// Authenticate `token` and return the merged account.
    ///
    /// # Errors
    ///
    /// - `NoRealmsConfigured` if there is no realm to consult
    /// - `UnsupportedToken` if a required realm cannot handle the token
    /// - `Realm` if a realm rejected the attempt and the strategy propagates it
    /// - `NoRealmSucceeded` if every realm rejected the attempt
    fn authenticate_account(
        &self,
        token: Box<dyn AuthenticationToken>,
    ) -> Result<Account, AuthenticationError>;
}
