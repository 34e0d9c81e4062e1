//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::cache::{DEFAULT_EVICTION_FRACTION, DEFAULT_NAMESPACE};
use crate::catalog::{DEFAULT_BASE_URL, DEFAULT_LIST_LIMIT, DEFAULT_TTL_MS};
use crate::storage::DEFAULT_QUOTA_BYTES;
use crate::team::TEAM_KEY;

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// JSON file backing the store; in-memory when unset
    pub store_path: Option<PathBuf>,
    /// Byte quota of the store (keys plus values)
    pub store_quota_bytes: usize,
    /// Prefix shared by all cache keys
    pub cache_namespace: String,
    /// Lifetime of cached species lists in milliseconds
    pub list_ttl_ms: i64,
    /// Lifetime of cached species details in milliseconds
    pub details_ttl_ms: i64,
    /// Share of cache entries evicted when the quota is hit
    pub eviction_fraction: f64,
    /// Interval in seconds between expired-entry sweeps, 0 disables
    pub sweep_interval: u64,
    /// Root of the remote API
    pub api_base_url: String,
    /// Species listed when a request gives no limit
    pub default_list_limit: u32,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORE_PATH` - Store file (default: unset, in-memory)
    /// - `STORE_QUOTA_BYTES` - Store quota (default: 5 MiB)
    /// - `CACHE_NAMESPACE` - Cache key prefix (default: "pokedex:"); ignored
    ///   when it would also match the team key
    /// - `LIST_TTL_MS` / `DETAILS_TTL_MS` - Entry lifetimes (default: 24h)
    /// - `EVICTION_FRACTION` - Share evicted on quota pressure (default: 0.2)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `POKEAPI_BASE_URL` - Remote API root
    /// - `DEFAULT_LIST_LIMIT` - Default list size (default: 151)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            store_path: env::var("STORE_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            store_quota_bytes: parse_var("STORE_QUOTA_BYTES")
                .unwrap_or(defaults.store_quota_bytes),
            cache_namespace: env::var("CACHE_NAMESPACE")
                .ok()
                .filter(|v| namespace_is_usable(v))
                .unwrap_or(defaults.cache_namespace),
            list_ttl_ms: parse_var("LIST_TTL_MS").unwrap_or(defaults.list_ttl_ms),
            details_ttl_ms: parse_var("DETAILS_TTL_MS").unwrap_or(defaults.details_ttl_ms),
            eviction_fraction: parse_var("EVICTION_FRACTION")
                .unwrap_or(defaults.eviction_fraction),
            sweep_interval: parse_var("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            api_base_url: env::var("POKEAPI_BASE_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_base_url),
            default_list_limit: parse_var("DEFAULT_LIST_LIMIT")
                .unwrap_or(defaults.default_list_limit),
        }
    }
}

/// A namespace must be non-empty and must not also cover the team key,
/// otherwise clearing the cache would wipe the team.
fn namespace_is_usable(namespace: &str) -> bool {
    if namespace.is_empty() {
        return false;
    }
    if TEAM_KEY.starts_with(namespace) {
        warn!(
            "CACHE_NAMESPACE \"{}\" would cover the team key {}, using the default",
            namespace, TEAM_KEY
        );
        return false;
    }
    true
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            store_path: None,
            store_quota_bytes: DEFAULT_QUOTA_BYTES,
            cache_namespace: DEFAULT_NAMESPACE.to_string(),
            list_ttl_ms: DEFAULT_TTL_MS,
            details_ttl_ms: DEFAULT_TTL_MS,
            eviction_fraction: DEFAULT_EVICTION_FRACTION,
            sweep_interval: 300,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            default_list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}
