use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The identifiers a subject is known by, grouped by the realm that
/// vouched for each of them.
///
/// The primary identifier is the first one recorded and is the value
/// authorization lookups key on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierCollection {
    primary: Option<String>,
    realms: BTreeMap<String, Vec<String>>,
}

impl IdentifierCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection holding a single identifier from one realm.
    #[must_use]
    pub fn for_realm(realm: impl Into<String>, identifier: impl Into<String>) -> Self {
        let mut ids = Self::new();
        ids.add(realm, identifier);
        ids
    }

    /// Record an identifier from `realm`. Duplicates within a realm are ignored.
    pub fn add(&mut self, realm: impl Into<String>, identifier: impl Into<String>) {
        let identifier = identifier.into();
        if self.primary.is_none() {
            self.primary = Some(identifier.clone());
        }
        let bucket = self.realms.entry(realm.into()).or_default();
        if !bucket.contains(&identifier) {
            bucket.push(identifier);
        }
    }

    /// Merge every identifier of `other` into this collection.
    pub fn add_all(&mut self, other: &IdentifierCollection) {
        for (realm, ids) in &other.realms {
            for id in ids {
                self.add(realm.clone(), id.clone());
            }
        }
    }

    #[must_use]
    pub fn primary_identifier(&self) -> Option<&str> {
        self.primary.as_deref()
    }

    /// Identifiers contributed by `realm`, in insertion order.
    #[must_use]
    pub fn from_realm(&self, realm: &str) -> &[String] {
        self.realms.get(realm).map_or(&[], Vec::as_slice)
    }

    pub fn realm_names(&self) -> impl Iterator<Item = &str> {
        self.realms.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.realms.is_empty()
    }
}
