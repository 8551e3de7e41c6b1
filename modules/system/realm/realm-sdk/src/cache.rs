//! Cache contract handed to [`AccountCacheAware`](crate::AccountCacheAware) realms.
//!
//! Values are stored as JSON so that one cache backend can hold whatever a
//! realm chooses to cache.

use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// Removal of a key that is not present.
    #[error("cannot remove '{key}': key not cached")]
    KeyRemoval { key: String },
}

/// A named key/value cache.
pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Store `value`, replacing any previous entry.
    fn put(&self, key: &str, value: serde_json::Value);

    /// Remove and return the entry for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::KeyRemoval`] if `key` is not cached.
    fn remove(&self, key: &str) -> Result<serde_json::Value, CacheError>;
}

/// Hands out caches by name. Asking twice for the same name returns the same cache.
pub trait CacheManager: Send + Sync {
    fn get_cache(&self, name: &str) -> Arc<dyn Cache>;
}
