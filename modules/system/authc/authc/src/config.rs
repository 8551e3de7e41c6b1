//! Configuration for warden authentication.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{
    AllRealmsSuccessful, AtLeastOneRealmSuccessful, AuthenticationStrategy, FirstRealmSuccessful,
};

/// Configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthcConfig {
    /// How outcomes from several realms are combined.
    pub strategy: StrategyKind,
}

/// Selects an [`AuthenticationStrategy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Every realm must accept the attempt.
    AllRealmsSuccessful,
    /// At least one realm must accept the attempt.
    #[default]
    AtLeastOneRealmSuccessful,
    /// Only the first realm is consulted.
    FirstRealmSuccessful,
}

impl StrategyKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllRealmsSuccessful => "all_realms_successful",
            Self::AtLeastOneRealmSuccessful => "at_least_one_realm_successful",
            Self::FirstRealmSuccessful => "first_realm_successful",
        }
    }

    #[must_use]
    pub fn build(self) -> Arc<dyn AuthenticationStrategy> {
        match self {
            Self::AllRealmsSuccessful => Arc::new(AllRealmsSuccessful),
            Self::AtLeastOneRealmSuccessful => Arc::new(AtLeastOneRealmSuccessful),
            Self::FirstRealmSuccessful => Arc::new(FirstRealmSuccessful),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
