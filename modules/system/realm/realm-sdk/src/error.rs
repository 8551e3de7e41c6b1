//! Error types raised by realms.

use thiserror::Error;

/// Errors a realm may return from [`Realm::authenticate_account`](crate::Realm::authenticate_account).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RealmError {
    /// The submitted credentials do not match the stored ones.
    #[error("incorrect credentials for '{principal}'")]
    IncorrectCredentials { principal: String },

    /// No account is known for the principal.
    #[error("no account found for '{principal}'")]
    AccountNotFound { principal: String },

    /// The account exists but may not log in.
    #[error("account '{principal}' is locked")]
    LockedAccount { principal: String },

    /// The realm does not handle tokens of this kind.
    #[error("unsupported token kind '{kind}'")]
    UnsupportedToken { kind: String },

    /// An unexpected failure inside the realm.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RealmError {
    /// Whether this is a failure of the credentials themselves, as opposed
    /// to a configuration or infrastructure problem.
    #[must_use]
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            Self::IncorrectCredentials { .. }
                | Self::AccountNotFound { .. }
                | Self::LockedAccount { .. }
        )
    }
}
