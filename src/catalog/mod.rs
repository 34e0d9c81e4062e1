//! Catalog Module
//!
//! Read-through wrappers around the remote API. Every lookup consults the
//! TTL cache first and falls back to the fetcher on a miss; fetch failures
//! propagate to the caller and are never cached.

mod fetcher;
mod naming;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::cache::TtlCache;
use crate::models::{PokemonDetails, PokemonListItem};

pub use fetcher::{FetchError, Fetcher, HttpFetcher, DEFAULT_BASE_URL};
pub use naming::{extract_pokemon_id, normalize_name, official_artwork_url, pad3};

// == Public Constants ==
/// One day, the lifetime of list and detail entries
pub const DEFAULT_TTL_MS: i64 = 1000 * 60 * 60 * 24;

/// Number of species listed when the caller gives no limit
pub const DEFAULT_LIST_LIMIT: u32 = 151;

// == Catalog Options ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOptions {
    pub list_ttl_ms: i64,
    pub details_ttl_ms: i64,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            list_ttl_ms: DEFAULT_TTL_MS,
            details_ttl_ms: DEFAULT_TTL_MS,
        }
    }
}

// == Catalog ==
/// Cached access to the species list and species details.
pub struct Catalog {
    cache: Arc<TtlCache>,
    fetcher: Arc<dyn Fetcher>,
    options: CatalogOptions,
}

impl Catalog {
    pub fn new(cache: Arc<TtlCache>, fetcher: Arc<dyn Fetcher>, options: CatalogOptions) -> Self {
        Self {
            cache,
            fetcher,
            options,
        }
    }

    pub fn cache(&self) -> &Arc<TtlCache> {
        &self.cache
    }

    // == List ==
    /// Returns the first `limit` species.
    ///
    /// An empty cached list counts as a miss.
    pub async fn list(
        &self,
        limit: u32,
        force_refresh: bool,
    ) -> Result<Vec<PokemonListItem>, FetchError> {
        let key = format!("{}list:{}", self.cache.namespace(), limit);

        if !force_refresh {
            if let Some(cached) = self.cached::<Vec<PokemonListItem>>(&key).await {
                if !cached.is_empty() {
                    debug!("Catalog list {} served from cache", limit);
                    return Ok(cached);
                }
            }
        }

        let items = self
            .fetch_list(limit)
            .await
            .inspect_err(|e| error!("Failed to fetch species list: {}", e))?;

        self.store(&key, items.clone(), self.options.list_ttl_ms).await;
        Ok(items)
    }

    // == By Name ==
    /// Returns details for a species looked up by name (case-insensitive).
    pub async fn by_name(
        &self,
        name: &str,
        force_refresh: bool,
    ) -> Result<PokemonDetails, FetchError> {
        if name.trim().is_empty() {
            return Err(FetchError::InvalidInput("species name is empty".to_string()));
        }
        let safe_name = normalize_name(name);

        let key = format!("{}details:name:{}", self.cache.namespace(), safe_name);
        self.details(&key, &format!("pokemon/{}", safe_name), force_refresh)
            .await
            .inspect_err(|e| error!("Failed to fetch species {}: {}", name, e))
    }

    // == By Id ==
    /// Returns details for a species looked up by numeric id.
    pub async fn by_id(&self, id: u32, force_refresh: bool) -> Result<PokemonDetails, FetchError> {
        let key = format!("{}details:id:{}", self.cache.namespace(), id);
        self.details(&key, &format!("pokemon/{}", id), force_refresh)
            .await
            .inspect_err(|e| error!("Failed to fetch species with id {}: {}", id, e))
    }

    async fn details(
        &self,
        key: &str,
        path: &str,
        force_refresh: bool,
    ) -> Result<PokemonDetails, FetchError> {
        if !force_refresh {
            if let Some(cached) = self.cached::<PokemonDetails>(key).await {
                debug!("Catalog entry {} served from cache", key);
                return Ok(cached);
            }
        }

        let payload = self.fetcher.fetch_json(path, &[]).await?;
        let details = parse_details(payload)?;

        self.store(key, details.clone(), self.options.details_ttl_ms).await;
        Ok(details)
    }

    // == Blocking Cache Access ==
    // Store backends may touch the disk, so cache calls run on the blocking pool.

    async fn cached<T>(&self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let cache = self.cache.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || cache.get::<T>(&key))
            .await
            .unwrap_or_else(|e| {
                warn!("Cache lookup task failed: {}", e);
                None
            })
    }

    async fn store<T>(&self, key: &str, value: T, ttl_ms: i64)
    where
        T: Serialize + Send + 'static,
    {
        let cache = self.cache.clone();
        let key = key.to_string();
        if let Err(e) = tokio::task::spawn_blocking(move || cache.set(&key, &value, ttl_ms)).await {
            warn!("Cache write task failed: {}", e);
        }
    }

    async fn fetch_list(&self, limit: u32) -> Result<Vec<PokemonListItem>, FetchError> {
        let payload = self
            .fetcher
            .fetch_json("pokemon", &[("limit", limit.to_string())])
            .await?;

        let results = payload
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::InvalidPayload("missing results array".to_string()))?;

        results
            .iter()
            .map(|item| {
                serde_json::from_value::<PokemonListItem>(item.clone())
                    .map_err(|e| FetchError::InvalidPayload(e.to_string()))
            })
            .collect()
    }
}

/// Decodes a details payload; a missing or zero id is invalid.
fn parse_details(payload: Value) -> Result<PokemonDetails, FetchError> {
    let details: PokemonDetails =
        serde_json::from_value(payload).map_err(|e| FetchError::InvalidPayload(e.to_string()))?;

    if details.id == 0 {
        return Err(FetchError::InvalidPayload("species id is missing".to_string()));
    }
    Ok(details)
}
