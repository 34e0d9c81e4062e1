//! In-memory key-value store with an optional byte quota.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{KvStore, StoreError};

// == Quota Map ==
/// HashMap that tracks its byte usage (keys plus values) against a quota.
///
/// Shared by the memory and file backends.
#[derive(Debug, Default, Clone)]
pub(crate) struct QuotaMap {
    entries: HashMap<String, String>,
    used_bytes: usize,
    quota: Option<usize>,
}

impl QuotaMap {
    pub(crate) fn new(quota: Option<usize>) -> Self {
        Self {
            entries: HashMap::new(),
            used_bytes: 0,
            quota,
        }
    }

    /// Builds a map from existing entries. Loaded data is accepted even if it
    /// already exceeds the quota; only new writes are checked.
    pub(crate) fn from_entries(entries: HashMap<String, String>, quota: Option<usize>) -> Self {
        let used_bytes = entries.iter().map(|(k, v)| k.len() + v.len()).sum();
        Self {
            entries,
            used_bytes,
            quota,
        }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&String> {
        self.entries.get(key)
    }

    pub(crate) fn insert(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let previous = self.entries.get(key).map_or(0, |v| key.len() + v.len());
        let needed = self.used_bytes - previous + key.len() + value.len();

        if let Some(quota) = self.quota {
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());
        self.used_bytes = needed;
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(value) => {
                self.used_bytes -= key.len() + value.len();
                true
            }
            None => false,
        }
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub(crate) fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    pub(crate) fn used_bytes(&self) -> usize {
        self.used_bytes
    }
}

// == Memory Store ==
/// Process-local store. Contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<QuotaMap>,
}

impl MemoryStore {
    /// Creates an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that refuses writes past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            inner: RwLock::new(QuotaMap::new(Some(quota_bytes))),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.read().entries().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes currently counted against the quota.
    pub fn used_bytes(&self) -> usize {
        self.inner.read().used_bytes()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.write().insert(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.inner.read().keys())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_absent_is_ok() {
        let store = MemoryStore::new();
        assert!(store.remove("missing").is_ok());
    }

    #[test]
    fn test_keys_snapshot() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();

        let mut keys = store.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

        // Mutating after the snapshot does not affect it
        store.remove("a").unwrap();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_quota_rejects_write() {
        let store = MemoryStore::with_quota(10);

        store.set("k1", "12345").unwrap(); // 7 bytes
        let err = store.set("k2", "12345").unwrap_err();

        assert!(err.is_quota_exceeded());
        assert_eq!(store.get("k2").unwrap(), None);
        assert_eq!(store.used_bytes(), 7);
    }

    #[test]
    fn test_quota_counts_overwrite_once() {
        let store = MemoryStore::with_quota(10);

        store.set("k", "123456789").unwrap(); // 10 bytes, at quota
        store.set("k", "abc").unwrap();
        assert_eq!(store.used_bytes(), 4);
    }

    #[test]
    fn test_remove_frees_quota() {
        let store = MemoryStore::with_quota(10);

        store.set("k1", "12345").unwrap();
        store.remove("k1").unwrap();
        assert_eq!(store.used_bytes(), 0);
        assert!(store.set("k2", "12345678").is_ok());
    }
}
