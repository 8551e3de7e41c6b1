//! Error types for warden authentication.

use realm_sdk::RealmError;
use thiserror::Error;

/// Errors returned when an authentication attempt fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthenticationError {
    /// The attempt carried no realms to consult.
    #[error("no realms configured for authentication")]
    NoRealmsConfigured,

    /// A realm that had to handle the token does not support it.
    #[error("realm '{realm}' does not support the submitted token")]
    UnsupportedToken { realm: String },

    /// A single realm rejected the attempt.
    #[error("realm '{realm}' rejected the attempt: {source}")]
    Realm {
        realm: String,
        #[source]
        source: RealmError,
    },

    /// Every realm was consulted and none accepted the attempt.
    #[error("authentication failed in all {} realm(s)", failures.len())]
    NoRealmSucceeded { failures: Vec<(String, RealmError)> },
}

impl AuthenticationError {
    /// Whether the failure is down to the submitted credentials rather than
    /// configuration.
    #[must_use]
    pub fn is_credential_error(&self) -> bool {
        match self {
            Self::Realm { source, .. } => source.is_credential_error(),
            Self::NoRealmSucceeded { failures } => {
                !failures.is_empty() && failures.iter().all(|(_, e)| e.is_credential_error())
            }
            Self::NoRealmsConfigured | Self::UnsupportedToken { .. } => false,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn aggregate_failure_reports_realm_count() {
        let err = AuthenticationError::NoRealmSucceeded {
            failures: vec![
                (
                    "realm1".to_owned(),
                    RealmError::IncorrectCredentials {
                        principal: "user".to_owned(),
                    },
                ),
                (
                    "realm2".to_owned(),
                    RealmError::AccountNotFound {
                        principal: "user".to_owned(),
                    },
                ),
            ],
        };
        assert_eq!(err.to_string(), "authentication failed in all 2 realm(s)");
        assert!(err.is_credential_error());
    }

    #[test]
    fn configuration_errors_are_not_credential_errors() {
        assert!(!AuthenticationError::NoRealmsConfigured.is_credential_error());
        let internal = AuthenticationError::Realm {
            realm: "realm1".to_owned(),
            source: RealmError::Internal("store offline".to_owned()),
        };
        assert!(!internal.is_credential_error());
    }
}
