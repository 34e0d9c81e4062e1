//! Integration Tests for the TTL cache contract
//!
//! Exercises the public cache API over both store backends.

use std::sync::Arc;

use pokedex_cache::cache::{CacheStats, ManualClock};
use pokedex_cache::{CacheOptions, FileStore, KvStore, MemoryStore, SetOutcome, TtlCache};
use serde::{Deserialize, Serialize};

const START: i64 = 1_700_000_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Species {
    id: u32,
    name: String,
    types: Vec<String>,
}

fn squirtle() -> Species {
    Species {
        id: 7,
        name: "squirtle".to_string(),
        types: vec!["water".to_string()],
    }
}

fn sorted_keys(store: &dyn KvStore) -> Vec<String> {
    let mut keys = store.keys().unwrap();
    keys.sort();
    keys
}

#[test]
fn test_file_backed_cache_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let clock = Arc::new(ManualClock::new(START));

    {
        let store = Arc::new(FileStore::open(&path, None).unwrap());
        let cache = TtlCache::with_clock(store, clock.clone(), CacheOptions::new("cache:"));
        assert_eq!(
            cache.set("cache:item:id:7", &squirtle(), 60_000),
            SetOutcome::Stored
        );
    }

    let store = Arc::new(FileStore::open(&path, None).unwrap());
    let cache = TtlCache::with_clock(store, clock.clone(), CacheOptions::new("cache:"));
    assert_eq!(cache.get::<Species>("cache:item:id:7"), Some(squirtle()));

    clock.advance(60_001);
    assert_eq!(cache.get::<Species>("cache:item:id:7"), None);
}

#[test]
fn test_null_and_empty_key_never_written() {
    let store = Arc::new(MemoryStore::new());
    let cache = TtlCache::new(store.clone(), CacheOptions::new("cache:"));

    assert_eq!(cache.set("", &squirtle(), 1_000), SetOutcome::Rejected);
    assert_eq!(
        cache.set("cache:k", &Option::<Species>::None, 1_000),
        SetOutcome::Rejected
    );
    assert!(store.is_empty());
}

#[test]
fn test_quota_pressure_evicts_and_retries() {
    let store = Arc::new(MemoryStore::with_quota(400));
    let clock = Arc::new(ManualClock::new(START));
    let cache = TtlCache::with_clock(store.clone(), clock.clone(), CacheOptions::new("cache:"));

    let mut outcomes = Vec::new();
    for i in 0..20 {
        outcomes.push(cache.set(&format!("cache:k{:02}", i), &i, 60_000));
        clock.advance(1);
    }

    // Every write lands, some only after eviction
    assert!(outcomes.iter().all(SetOutcome::is_stored));
    assert!(outcomes.contains(&SetOutcome::StoredAfterEviction));
    assert!(store.used_bytes() <= 400);

    // The newest entry is always kept, the oldest went first
    assert_eq!(cache.get::<i32>("cache:k19"), Some(19));
    assert_eq!(cache.get::<i32>("cache:k00"), None);
}

#[test]
fn test_oversized_value_is_dropped() {
    let store = Arc::new(MemoryStore::with_quota(64));
    let cache = TtlCache::new(store.clone(), CacheOptions::new("cache:"));
    cache.set("cache:small", &1, 60_000);

    let huge = "x".repeat(1_000);
    assert_eq!(cache.set("cache:huge", &huge, 60_000), SetOutcome::Dropped);
    assert_eq!(cache.get::<String>("cache:huge"), None);
}

#[test]
fn test_mixed_namespace_maintenance() {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(START));
    let cache = TtlCache::with_clock(store.clone(), clock.clone(), CacheOptions::new("cache:"));

    for key in ["cache:list:a", "cache:list:b", "cache:item:name:c"] {
        cache.set(key, &key, 5);
    }
    cache.set("cache:item:id:1", &1, 60_000);
    cache.set("cache:item:id:2", &2, 60_000);
    store.set("team", "[]").unwrap();
    clock.advance(6);

    assert_eq!(
        cache.stats(),
        CacheStats {
            total: 5,
            valid: 2,
            expired: 3
        }
    );
    assert_eq!(store.len(), 6);

    assert_eq!(cache.sweep_expired(), 3);
    assert_eq!(
        sorted_keys(&*store),
        vec![
            "cache:item:id:1".to_string(),
            "cache:item:id:2".to_string(),
            "team".to_string()
        ]
    );

    assert_eq!(cache.clear_namespace(), 2);
    assert_eq!(sorted_keys(&*store), vec!["team".to_string()]);
}
