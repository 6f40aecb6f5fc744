//! Key-value store abstraction backing the marketplace.
//!
//! The repository persists every collection as one JSON string under a fixed
//! key. Stores only move strings around; parsing is the repository's job.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{MarketError, Result};

/// Keys under which the marketplace collections are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    /// Ordered list of farmer records.
    Farmers,
    /// Ordered list of product records.
    Products,
    /// Singleton session projection, absent when nobody is logged in.
    CurrentFarmer,
    /// Ordered list of product view records.
    ProductViews,
    /// Ordered list of login records.
    LoginHistory,
}

impl StoreKey {
    pub const ALL: [StoreKey; 5] = [
        StoreKey::Farmers,
        StoreKey::Products,
        StoreKey::CurrentFarmer,
        StoreKey::ProductViews,
        StoreKey::LoginHistory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Farmers => "farmers",
            StoreKey::Products => "products",
            StoreKey::CurrentFarmer => "current_farmer",
            StoreKey::ProductViews => "product_views",
            StoreKey::LoginHistory => "login_history",
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string-keyed, string-valued persistent store.
///
/// Receivers are shared references; implementations use interior mutability.
/// No operation is transactional across keys.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store. Contents vanish when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| MarketError::storage(format!("Memory store lock poisoned: {}", e)))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("farmers").unwrap(), None);

        store.set("farmers", "[]").unwrap();
        assert_eq!(store.get("farmers").unwrap(), Some("[]".to_string()));

        store.remove("farmers").unwrap();
        assert_eq!(store.get("farmers").unwrap(), None);

        // Removing again is fine
        store.remove("farmers").unwrap();
    }

    #[test]
    fn test_store_key_names() {
        let names: Vec<&str> = StoreKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "farmers",
                "products",
                "current_farmer",
                "product_views",
                "login_history"
            ]
        );
    }
}
