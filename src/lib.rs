//! Pokedex Cache - A catalog gateway backed by a local TTL cache
//!
//! Serves a remote species catalog through an expiring key-value cache with
//! quota-aware eviction, and keeps a small persisted team roster.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;
pub mod team;

pub use api::AppState;
pub use cache::{CacheOptions, SetOutcome, TtlCache};
pub use config::Config;
pub use storage::{FileStore, KvStore, MemoryStore, StoreError};
pub use tasks::spawn_sweep_task;
