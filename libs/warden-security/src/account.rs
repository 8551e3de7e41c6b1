use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifiers::IdentifierCollection;

/// Identifier a realm assigns to an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for AccountId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// The outcome of a successful authentication.
///
/// Two accounts are equal when their id, credentials and attributes are
/// equal. Which realms contributed to an account is tracked separately and
/// does not take part in equality.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Account {
    account_id: AccountId,
    #[serde(skip)]
    credentials: BTreeMap<String, String>,
    #[serde(default)]
    attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    source_realms: Vec<(String, AccountId)>,
}

impl Account {
    #[must_use]
    pub fn new(account_id: impl Into<AccountId>) -> Self {
        Self {
            account_id: account_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_credential(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.credentials.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    #[must_use]
    pub fn credentials(&self) -> &BTreeMap<String, String> {
        &self.credentials
    }

    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.attributes
    }

    /// Realms that contributed to this account, with the id each one reported.
    #[must_use]
    pub fn source_realms(&self) -> &[(String, AccountId)] {
        &self.source_realms
    }

    /// Fold the account returned by `realm` into this one.
    ///
    /// The first non-empty account id wins. For credentials and attributes
    /// the first writer of a key wins as well. Every merge is recorded in
    /// [`Account::source_realms`].
    pub fn merge(&mut self, realm: &str, other: Account) {
        if self.account_id.is_empty() && !other.account_id.is_empty() {
            self.account_id = other.account_id.clone();
        }
        for (key, value) in other.credentials {
            self.credentials.entry(key).or_insert(value);
        }
        for (key, value) in other.attributes {
            self.attributes.entry(key).or_insert(value);
        }
        self.source_realms.push((realm.to_owned(), other.account_id));
        for source in other.source_realms {
            if !self.source_realms.contains(&source) {
                self.source_realms.push(source);
            }
        }
    }

    /// Identifiers of this account grouped by contributing realm.
    ///
    /// Falls back to the bare account id under an unnamed realm when no
    /// provenance was recorded.
    #[must_use]
    pub fn identifiers(&self) -> IdentifierCollection {
        let mut ids = IdentifierCollection::new();
        if !self.account_id.is_empty() {
            let first_realm = self
                .source_realms
                .iter()
                .find(|(_, id)| *id == self.account_id)
                .map_or("", |(realm, _)| realm.as_str());
            ids.add(first_realm, self.account_id.as_str());
        }
        for (realm, id) in &self.source_realms {
            if !id.is_empty() {
                ids.add(realm.clone(), id.as_str());
            }
        }
        ids
    }

    /// Copy of this account with credentials stripped, safe to hand to callers.
    #[must_use]
    pub fn without_credentials(&self) -> Self {
        Self {
            credentials: BTreeMap::new(),
            ..self.clone()
        }
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.account_id == other.account_id
            && self.credentials == other.credentials
            && self.attributes == other.attributes
    }
}

impl Eq for Account {}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("account_id", &self.account_id)
            .field("credentials", &self.credentials.keys().collect::<Vec<_>>())
            .field("attributes", &self.attributes)
            .field("source_realms", &self.source_realms)
            .finish()
    }
}
