//! Storage Module
//!
//! Key-value persistence underneath the TTL cache and the team roster.
//! Backends serialize their own operations, so every method takes `&self`.

mod file;
mod memory;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

// == Public Constants ==
/// Default byte quota, matching what browsers grant local storage.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

// == Store Error ==
/// Failures a key-value backend can report.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Writing would push usage past the configured quota
    #[error("Quota exceeded: {needed} bytes needed, quota is {quota} bytes")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Underlying file operation failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted data could not be decoded
    #[error("Corrupt storage: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Returns true when the failure is a capacity condition.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StoreError::QuotaExceeded { .. })
    }
}

// == KvStore Trait ==
/// A string key-value map with enumerable keys.
///
/// `keys` returns an owned snapshot; callers may mutate the store while
/// walking it.
pub trait KvStore: Send + Sync {
    /// Returns the raw value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Returns every key currently stored, in no particular order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Removes each of `keys`, returning one result per key in order.
    ///
    /// A failure for one key does not stop the others. Backends with costly
    /// writes override this to commit the batch once.
    fn remove_many(&self, keys: &[String]) -> Vec<Result<(), StoreError>> {
        keys.iter().map(|key| self.remove(key)).collect()
    }
}
