//! API Handlers
//!
//! HTTP request handlers for the catalog, team and cache maintenance endpoints.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use tokio::sync::RwLock;
use tracing::info;

use crate::cache::{CacheOptions, Clock, SystemClock, TtlCache};
use crate::catalog::{Catalog, CatalogOptions, Fetcher, HttpFetcher};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    HealthResponse, ListQuery, ListResponse, PokemonDetails, RefreshQuery, RemovedResponse,
    StatsResponse, TeamResponse, ToggleRequest,
};
use crate::storage::{FileStore, KvStore, MemoryStore};
use crate::team::Team;

/// Application state shared across all handlers.
///
/// The cache and catalog are internally synchronized by their store; the
/// team is mutable state behind an async lock.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<TtlCache>,
    pub catalog: Arc<Catalog>,
    pub team: Arc<RwLock<Team>>,
    pub default_list_limit: u32,
}

impl AppState {
    /// Creates a new AppState over the given store and fetcher.
    pub fn new(store: Arc<dyn KvStore>, fetcher: Arc<dyn Fetcher>, config: &Config) -> Self {
        Self::with_clock(store, Arc::new(SystemClock), fetcher, config)
    }

    /// Same as [`AppState::new`] with an explicit time source.
    pub fn with_clock(
        store: Arc<dyn KvStore>,
        clock: Arc<dyn Clock>,
        fetcher: Arc<dyn Fetcher>,
        config: &Config,
    ) -> Self {
        let options = CacheOptions::new(config.cache_namespace.clone())
            .with_eviction_fraction(config.eviction_fraction);
        let cache = Arc::new(TtlCache::with_clock(store.clone(), clock, options));

        let catalog = Catalog::new(
            cache.clone(),
            fetcher,
            CatalogOptions {
                list_ttl_ms: config.list_ttl_ms,
                details_ttl_ms: config.details_ttl_ms,
            },
        );

        Self {
            cache,
            catalog: Arc::new(catalog),
            team: Arc::new(RwLock::new(Team::load(store))),
            default_list_limit: config.default_list_limit,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens the file store when `store_path` is set, otherwise keeps
    /// everything in memory, and connects to the configured remote API.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn KvStore> = match &config.store_path {
            Some(path) => Arc::new(
                FileStore::open(path, Some(config.store_quota_bytes))
                    .with_context(|| format!("opening store at {}", path.display()))?,
            ),
            None => {
                info!("No STORE_PATH set, using in-memory store");
                Arc::new(MemoryStore::with_quota(config.store_quota_bytes))
            }
        };

        let fetcher = HttpFetcher::new(config.api_base_url.clone())
            .context("building HTTP client")?;

        Ok(Self::new(store, Arc::new(fetcher), config))
    }
}

// == Catalog ==

/// Handler for GET /pokemon
pub async fn list_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    let limit = query.limit.unwrap_or(state.default_list_limit);
    if limit == 0 {
        return Err(AppError::InvalidRequest(
            "Limit must be a positive number".to_string(),
        ));
    }

    let items = state.catalog.list(limit, query.refresh).await?;
    Ok(Json(ListResponse::new(items)))
}

/// Handler for GET /pokemon/name/:name
pub async fn details_by_name_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<PokemonDetails>> {
    let details = state.catalog.by_name(&name, query.refresh).await?;
    Ok(Json(details))
}

/// Handler for GET /pokemon/id/:id
pub async fn details_by_id_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<PokemonDetails>> {
    if id == 0 {
        return Err(AppError::InvalidRequest(
            "Id must be a positive number".to_string(),
        ));
    }

    let details = state.catalog.by_id(id, query.refresh).await?;
    Ok(Json(details))
}

// == Team ==

/// Handler for GET /team
pub async fn team_handler(State(state): State<AppState>) -> Json<TeamResponse> {
    let team = state.team.read().await;
    Json(TeamResponse::from_team(&team))
}

/// Handler for POST /team/toggle
///
/// Adds the species, or removes it if already on the team. Adding to a full
/// team is refused with 409.
pub async fn toggle_member_handler(
    State(state): State<AppState>,
    Json(req): Json<ToggleRequest>,
) -> Result<Json<TeamResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(AppError::InvalidRequest(error_msg));
    }

    let mut team = state.team.clone().write_owned().await;
    let member = req.into_member();

    let response = run_blocking(move || {
        let name = member.name.clone();
        if !team.toggle(member) {
            return Err(AppError::TeamFull(format!(
                "cannot add {}, the team already has {} members",
                name,
                team.len()
            )));
        }
        Ok(TeamResponse::from_team(&team))
    })
    .await??;

    Ok(Json(response))
}

/// Handler for DELETE /team/:id
pub async fn remove_member_handler(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<TeamResponse>> {
    let mut team = state.team.clone().write_owned().await;
    let response = run_blocking(move || {
        team.remove(id);
        TeamResponse::from_team(&team)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for DELETE /team
pub async fn clear_team_handler(State(state): State<AppState>) -> Result<Json<TeamResponse>> {
    let mut team = state.team.clone().write_owned().await;
    let response = run_blocking(move || {
        team.clear();
        TeamResponse::from_team(&team)
    })
    .await?;
    Ok(Json(response))
}

// == Cache Maintenance ==

/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = run_blocking(move || state.cache.stats()).await?;
    Ok(Json(StatsResponse::from(stats)))
}

/// Handler for POST /cache/sweep
pub async fn sweep_handler(State(state): State<AppState>) -> Result<Json<RemovedResponse>> {
    let removed = run_blocking(move || state.cache.sweep_expired()).await?;
    Ok(Json(RemovedResponse::new(removed, "expired entries")))
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Result<Json<RemovedResponse>> {
    let removed = run_blocking(move || state.cache.clear_namespace()).await?;
    Ok(Json(RemovedResponse::new(removed, "cache entries")))
}

/// Handler for DELETE /cache/prefix/:prefix
///
/// The prefix is relative to the cache namespace, e.g. `list:`.
pub async fn remove_prefix_handler(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Result<Json<RemovedResponse>> {
    let full_prefix = format!("{}{}", state.cache.namespace(), prefix);
    let removed = run_blocking(move || state.cache.remove_by_prefix(&full_prefix)).await?;
    Ok(Json(RemovedResponse::new(removed, "cache entries")))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Runs store-touching work on the blocking pool, off the async workers.
async fn run_blocking<F, R>(work: F) -> Result<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {}", e)))
}
