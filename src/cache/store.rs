//! Cache Store Module
//!
//! TTL cache layered over a [`KvStore`]. The cache holds no entries itself:
//! every call reads or writes the backing store directly, and every failure
//! degrades to "absent" plus a `tracing` warning so the cache is never the
//! reason a caller fails.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};
use crate::cache::{DEFAULT_EVICTION_FRACTION, DEFAULT_NAMESPACE};
use crate::storage::KvStore;

// == Cache Options ==
/// Namespace and eviction policy for a [`TtlCache`].
#[derive(Debug, Clone, PartialEq)]
pub struct CacheOptions {
    /// Prefix shared by every key this cache manages in bulk
    pub namespace: String,
    /// Share of namespaced entries dropped when a write hits the quota
    pub eviction_fraction: f64,
}

impl CacheOptions {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            eviction_fraction: DEFAULT_EVICTION_FRACTION,
        }
    }

    pub fn with_eviction_fraction(mut self, fraction: f64) -> Self {
        self.eviction_fraction = fraction;
        self
    }

    /// Fraction clamped into `(0, 1]`; unusable values fall back to the default.
    fn effective_fraction(&self) -> f64 {
        if self.eviction_fraction.is_nan() || self.eviction_fraction <= 0.0 {
            DEFAULT_EVICTION_FRACTION
        } else {
            self.eviction_fraction.min(1.0)
        }
    }
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

// == Set Outcome ==
/// What happened to a write. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// Written on the first attempt
    Stored,
    /// Written after evicting entries to free space
    StoredAfterEviction,
    /// Refused before touching the store (empty key or null value)
    Rejected,
    /// The store refused the write; nothing was cached
    Dropped,
}

impl SetOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, SetOutcome::Stored | SetOutcome::StoredAfterEviction)
    }
}

// == TTL Cache ==
/// Expiring key-value cache over an injected store.
pub struct TtlCache {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    options: CacheOptions,
}

impl TtlCache {
    // == Constructor ==
    /// Creates a cache on wall-clock time.
    pub fn new(store: Arc<dyn KvStore>, options: CacheOptions) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), options)
    }

    /// Creates a cache with an explicit time source.
    pub fn with_clock(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>, options: CacheOptions) -> Self {
        Self {
            store,
            clock,
            options,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.options.namespace
    }

    // == Get ==
    /// Returns the cached value for `key` if present, well-formed and fresh.
    ///
    /// Malformed and expired entries are deleted on the way out.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read cache key {}: {}", key, e);
                return None;
            }
        };

        let entry = match CacheEntry::parse(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cache entry for key {} is corrupted ({}), removing", key, e);
                self.remove(key);
                return None;
            }
        };

        if entry.is_expired_at(self.clock.now_ms()) {
            debug!("Cache entry for key {} expired", key);
            self.remove(key);
            return None;
        }

        match serde_json::from_value(entry.value) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    "Cache entry for key {} has an unexpected shape ({}), removing",
                    key, e
                );
                self.remove(key);
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl_ms` milliseconds.
    ///
    /// On a quota failure the oldest namespaced entries are evicted and the
    /// write is retried once.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_ms: i64) -> SetOutcome {
        if key.is_empty() {
            warn!("Refusing to cache a value under an empty key");
            return SetOutcome::Rejected;
        }

        let value = match serde_json::to_value(value) {
            Ok(Value::Null) => {
                warn!("Refusing to cache a null value for key {}", key);
                return SetOutcome::Rejected;
            }
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to serialize cache value for key {}: {}", key, e);
                return SetOutcome::Rejected;
            }
        };

        let raw = match CacheEntry::new(value, self.clock.now_ms(), ttl_ms).encode() {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode cache entry for key {}: {}", key, e);
                return SetOutcome::Rejected;
            }
        };

        match self.store.set(key, &raw) {
            Ok(()) => SetOutcome::Stored,
            Err(e) if e.is_quota_exceeded() => {
                warn!("Cache write for key {} hit the quota ({}), evicting", key, e);
                self.evict_oldest();

                match self.store.set(key, &raw) {
                    Ok(()) => SetOutcome::StoredAfterEviction,
                    Err(e) => {
                        warn!("Cache write for key {} dropped after eviction: {}", key, e);
                        SetOutcome::Dropped
                    }
                }
            }
            Err(e) => {
                warn!("Failed to write cache key {}: {}", key, e);
                SetOutcome::Dropped
            }
        }
    }

    // == Remove ==
    /// Deletes `key`. Absent keys are fine.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!("Failed to remove cache key {}: {}", key, e);
        }
    }

    // == Remove By Prefix ==
    /// Deletes every key starting with `prefix` and returns how many went.
    ///
    /// Keys are snapshotted once up front; a failed delete does not stop the
    /// sweep.
    pub fn remove_by_prefix(&self, prefix: &str) -> usize {
        let targets: Vec<String> = self
            .snapshot_keys()
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect();

        let removed = self.remove_keys(&targets);

        if removed > 0 {
            info!("Removed {} cache entries with prefix \"{}\"", removed, prefix);
        }
        removed
    }

    // == Clear Namespace ==
    /// Deletes every entry under this cache's namespace.
    pub fn clear_namespace(&self) -> usize {
        let removed = self.remove_by_prefix(&self.options.namespace);
        info!("Cache cleared: {} entries removed", removed);
        removed
    }

    // == Sweep Expired ==
    /// Deletes malformed and expired namespaced entries, returning the count.
    pub fn sweep_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut stale = Vec::new();

        for key in self.namespaced_keys() {
            let raw = match self.store.get(&key) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Failed to read cache key {} during sweep: {}", key, e);
                    continue;
                }
            };

            let expired = match CacheEntry::parse(&raw) {
                Ok(entry) => entry.is_expired_at(now),
                Err(_) => true,
            };
            if expired {
                stale.push(key);
            }
        }

        self.remove_keys(&stale)
    }

    // == Evict Oldest ==
    /// Frees space by deleting the namespaced entries closest to expiry.
    ///
    /// Malformed entries met along the way are deleted without counting
    /// toward the quota. Returns the number of entries evicted.
    pub fn evict_oldest(&self) -> usize {
        let mut candidates: Vec<(i64, String)> = Vec::new();
        let mut malformed = Vec::new();

        for key in self.namespaced_keys() {
            match self.store.get(&key) {
                Ok(Some(raw)) => match CacheEntry::parse(&raw) {
                    Ok(entry) => candidates.push((entry.expires_at, key)),
                    Err(_) => malformed.push(key),
                },
                Ok(None) => {}
                Err(e) => warn!("Failed to read cache key {} during eviction: {}", key, e),
            }
        }

        self.remove_keys(&malformed);
        if candidates.is_empty() {
            return 0;
        }

        // Soonest expiry first; key order settles ties
        candidates.sort();

        let quota = (candidates.len() as f64 * self.options.effective_fraction()).ceil() as usize;
        let quota = quota.clamp(1, candidates.len());

        let victims: Vec<String> = candidates
            .iter()
            .take(quota)
            .map(|(_, key)| key.clone())
            .collect();
        let evicted = self.remove_keys(&victims);

        info!(
            "Evicted {} of {} cache entries to free space",
            evicted,
            candidates.len()
        );
        evicted
    }

    // == Stats ==
    /// Classifies namespaced entries without modifying any of them.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now_ms();
        let mut stats = CacheStats::new();

        for key in self.namespaced_keys() {
            let fresh = match self.store.get(&key) {
                Ok(Some(raw)) => CacheEntry::parse(&raw)
                    .map(|entry| !entry.is_expired_at(now))
                    .unwrap_or(false),
                Ok(None) | Err(_) => false,
            };

            if fresh {
                stats.record_valid();
            } else {
                stats.record_expired();
            }
        }

        stats
    }

    // == Batch Removal ==
    /// Removes `keys` in one batch, logging and skipping individual failures.
    fn remove_keys(&self, keys: &[String]) -> usize {
        if keys.is_empty() {
            return 0;
        }

        let mut removed = 0;
        for (key, result) in keys.iter().zip(self.store.remove_many(keys)) {
            match result {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to remove cache key {}: {}", key, e),
            }
        }
        removed
    }

    // == Key Snapshots ==
    fn snapshot_keys(&self) -> Vec<String> {
        self.store.keys().unwrap_or_else(|e| {
            warn!("Failed to enumerate cache keys: {}", e);
            Vec::new()
        })
    }

    fn namespaced_keys(&self) -> Vec<String> {
        let namespace = &self.options.namespace;
        self.snapshot_keys()
            .into_iter()
            .filter(|key| key.starts_with(namespace.as_str()))
            .collect()
    }
}
