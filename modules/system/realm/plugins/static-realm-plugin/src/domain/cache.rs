//! In-memory cache backend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use realm_sdk::{Cache, CacheError, CacheManager};

/// Process-local cache backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, serde_json::Value>>,
}

impl InMemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Cache for InMemoryCache {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: &str, value: serde_json::Value) {
        self.entries.write().insert(key.to_owned(), value);
    }

    fn remove(&self, key: &str) -> Result<serde_json::Value, CacheError> {
        self.entries
            .write()
            .remove(key)
            .ok_or_else(|| CacheError::KeyRemoval {
                key: key.to_owned(),
            })
    }
}

/// Hands out one [`InMemoryCache`] per name.
#[derive(Debug, Default)]
pub struct InMemoryCacheManager {
    caches: RwLock<HashMap<String, Arc<InMemoryCache>>>,
}

impl InMemoryCacheManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheManager for InMemoryCacheManager {
    fn get_cache(&self, name: &str) -> Arc<dyn Cache> {
        if let Some(cache) = self.caches.read().get(name) {
            return Arc::clone(cache) as Arc<dyn Cache>;
        }
        let mut caches = self.caches.write();
        let cache = caches
            .entry(name.to_owned())
            .or_insert_with(|| Arc::new(InMemoryCache::new()));
        Arc::clone(cache) as Arc<dyn Cache>
    }
}
