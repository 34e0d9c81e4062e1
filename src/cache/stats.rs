//! Cache Statistics Module
//!
//! Point-in-time classification of the namespaced entries.

use serde::Serialize;

// == Cache Stats ==
/// Counts of namespaced entries by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries examined (`valid + expired`)
    pub total: usize,
    /// Entries that parse and have not expired
    pub valid: usize,
    /// Entries that are missing, malformed or past their expiry
    pub expired: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Valid ==
    pub fn record_valid(&mut self) {
        self.valid += 1;
        self.total += 1;
    }

    // == Record Expired ==
    pub fn record_expired(&mut self) {
        self.expired += 1;
        self.total += 1;
    }

    // == Valid Ratio ==
    /// Share of entries still usable, or 0.0 for an empty cache.
    pub fn valid_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.valid as f64 / self.total as f64
        }
    }
}
