//! File-backed key-value store.
//!
//! Keeps the whole map in memory and rewrites a JSON file after every
//! mutation, so entries survive process restarts. Batch removals rewrite the
//! file once. All I/O is synchronous; async callers go through
//! `spawn_blocking`.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info};

use super::memory::QuotaMap;
use super::{KvStore, StoreError};

// == File Store ==
/// Store persisted as a JSON object of string keys to string values.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: Mutex<QuotaMap>,
}

impl FileStore {
    // == Constructor ==
    /// Opens `path`, loading existing contents if the file exists.
    ///
    /// # Arguments
    /// * `path` - Location of the JSON file
    /// * `quota_bytes` - Optional byte quota for keys plus values
    pub fn open(path: impl AsRef<Path>, quota_bytes: Option<usize>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let entries: HashMap<String, String> = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => HashMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                StoreError::Corrupt(format!("{}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(
            "Opened file store at {} with {} keys",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            inner: Mutex::new(QuotaMap::from_entries(entries, quota_bytes)),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // == Persist ==
    /// Writes the map to a sibling temp file, then renames it into place.
    fn persist(&self, map: &QuotaMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let body = serde_json::to_string(map.entries())
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Persisted {} keys to {}", map.entries().len(), self.path.display());
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self.inner.lock();
        let mut next = guard.clone();
        next.insert(key, value)?;
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut guard = self.inner.lock();
        let mut next = guard.clone();
        if !next.remove(key) {
            return Ok(());
        }
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.inner.lock().keys())
    }

    fn remove_many(&self, keys: &[String]) -> Vec<Result<(), StoreError>> {
        let mut guard = self.inner.lock();
        let mut next = guard.clone();

        let mut changed = false;
        for key in keys {
            changed |= next.remove(key);
        }
        if !changed {
            return keys.iter().map(|_| Ok(())).collect();
        }

        match self.persist(&next) {
            Ok(()) => {
                *guard = next;
                keys.iter().map(|_| Ok(())).collect()
            }
            Err(e) => {
                // Nothing was committed, so every key reports the same failure
                let reason = e.to_string();
                keys.iter()
                    .map(|_| Err(StoreError::Io(std::io::Error::other(reason.clone()))))
                    .collect()
            }
        }
    }
}
