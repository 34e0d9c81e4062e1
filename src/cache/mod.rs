//! Cache Module
//!
//! Expiring key-value cache over a pluggable store, with lazy expiry,
//! quota-triggered eviction and namespace-wide maintenance.

mod clock;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, EntryError};
pub use stats::CacheStats;
pub use store::{CacheOptions, SetOutcome, TtlCache};

// == Public Constants ==
/// Prefix shared by every cache key
pub const DEFAULT_NAMESPACE: &str = "pokedex:";

/// Share of entries evicted when a write hits the storage quota
pub const DEFAULT_EVICTION_FRACTION: f64 = 0.2;
