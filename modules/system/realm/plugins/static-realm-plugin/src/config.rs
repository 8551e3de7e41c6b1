//! Configuration for the static realm.

use std::collections::BTreeMap;

use secrecy::SecretString;
use serde::Deserialize;

/// Realm configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticRealmConfig {
    /// Realm name, used as the key for identifiers this realm vouches for.
    pub name: String,

    /// Salt prepended to every password before hashing.
    pub private_salt: SecretString,

    /// Cache built authorization info per account.
    pub cache_accounts: bool,

    /// Role definitions referenced by accounts.
    pub roles: Vec<RoleConfig>,

    /// Known accounts.
    pub accounts: Vec<AccountConfig>,
}

impl Default for StaticRealmConfig {
    fn default() -> Self {
        Self {
            name: "static".to_owned(),
            private_salt: SecretString::from(String::new()),
            cache_accounts: false,
            roles: Vec::new(),
            accounts: Vec::new(),
        }
    }
}

/// A named set of permission strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleConfig {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// One account of the realm.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    /// Login name matched against the token principal.
    pub username: String,

    /// Account id reported on success. Defaults to the username.
    #[serde(default)]
    pub account_id: Option<String>,

    /// Hex SHA-256 of `private_salt || password`.
    pub password_hash: String,

    /// Locked accounts never authenticate.
    #[serde(default)]
    pub locked: bool,

    /// Names of roles from [`StaticRealmConfig::roles`].
    #[serde(default)]
    pub roles: Vec<String>,

    /// Permission strings granted directly.
    #[serde(default)]
    pub permissions: Vec<String>,

    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl AccountConfig {
    #[must_use]
    pub fn account_id(&self) -> &str {
        self.account_id.as_deref().unwrap_or(&self.username)
    }
}
