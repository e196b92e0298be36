//! In-memory key-value store.
//!
//! Backs tests and `--mock` runs. A `BTreeMap` keeps keys ordered, so
//! prefix scans are lexicographic without extra sorting.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{KvStore, StoreError};

/// Key-value store held entirely in process memory.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn get_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, StoreError> {
        let entries = self.entries.read();
        Ok(entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.write().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryStore::new();
        store.put("/registry/a", "1").await.unwrap();
        assert_eq!(store.get("/registry/a").await.unwrap(), Some("1".to_owned()));
        assert_eq!(store.get("/registry/b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_prefix_scan_is_lexicographic() {
        let store = MemoryStore::new();
        store.put("/registry/t/c", "3").await.unwrap();
        store.put("/registry/t/a", "1").await.unwrap();
        store.put("/registry/t/b", "2").await.unwrap();
        store.put("/registry/u/x", "9").await.unwrap();

        let entries = store.get_prefix("/registry/t").await.unwrap();
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["/registry/t/a", "/registry/t/b", "/registry/t/c"]);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_present() {
        let store = MemoryStore::new();
        store.put("/registry/a", "1").await.unwrap();
        assert!(store.delete("/registry/a").await.unwrap());
        assert!(!store.delete("/registry/a").await.unwrap());
        assert_eq!(store.get("/registry/a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_keeps_single_entry() {
        let store = MemoryStore::new();
        store.put("/registry/a", "1").await.unwrap();
        store.put("/registry/a", "2").await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("/registry/a").await.unwrap(), Some("2".to_owned()));
    }
}
