//! In-memory key-value store.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::KeyValueStore;
use crate::error::{Error, Result};

/// Volatile store backed by a shared map.
///
/// Clones share the same map. Writes can be made to fail on demand with
/// [`MemoryStore::fail_writes`], which is how write-failure handling is
/// exercised in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<BTreeMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the store holds no keys.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::storage_write(key, "writes disabled"));
        }
        self.items
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<bool> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::storage_write(key, "writes disabled"));
        }
        Ok(self.items.write().await.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.items.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip_and_count() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);

        store.set_item("a", "1").await.unwrap();
        assert_eq!(store.get_item("a").await.unwrap().as_deref(), Some("1"));
        assert_eq!(store.len().await, 1);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_fail_writes() {
        let store = MemoryStore::new();
        store.fail_writes(true);

        let err = store.set_item("a", "1").await.unwrap_err();
        assert!(err.is_write_failure());
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.get_item("a").await.unwrap(), None);

        store.fail_writes(false);
        store.set_item("a", "1").await.unwrap();
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_items() {
        let store = MemoryStore::new();
        let clone = store.clone();
        clone.set_item("k", "v").await.unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["k".to_string()]);
        assert!(store.remove_item("k").await.unwrap());
        assert!(clone.is_empty().await);
    }
}
