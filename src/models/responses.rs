//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::catalog::{extract_pokemon_id, official_artwork_url, pad3};
use crate::models::PokemonListItem;
use crate::team::{Team, TeamMember, TEAM_MAX};

/// One row of the species list, enriched for display
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    pub id: u32,
    /// Zero-padded id, e.g. "025"
    pub number: String,
    pub name: String,
    pub url: String,
    pub image: String,
}

impl From<PokemonListItem> for ListEntry {
    fn from(item: PokemonListItem) -> Self {
        let id = extract_pokemon_id(&item.url);
        Self {
            id,
            number: pad3(id),
            name: item.name,
            url: item.url,
            image: official_artwork_url(id),
        }
    }
}

/// Response body for the species list (GET /pokemon)
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub count: usize,
    pub results: Vec<ListEntry>,
}

impl ListResponse {
    pub fn new(items: Vec<PokemonListItem>) -> Self {
        let results: Vec<ListEntry> = items.into_iter().map(ListEntry::from).collect();
        Self {
            count: results.len(),
            results,
        }
    }
}

/// Response body for every team endpoint
#[derive(Debug, Clone, Serialize)]
pub struct TeamResponse {
    pub members: Vec<TeamMember>,
    pub size: usize,
    pub capacity: usize,
    pub is_full: bool,
}

impl TeamResponse {
    pub fn from_team(team: &Team) -> Self {
        Self {
            members: team.members().to_vec(),
            size: team.len(),
            capacity: TEAM_MAX,
            is_full: team.is_full(),
        }
    }
}

/// Response body for the stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total: usize,
    pub valid: usize,
    pub expired: usize,
    /// valid / total
    pub valid_ratio: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            total: stats.total,
            valid: stats.valid,
            expired: stats.expired,
            valid_ratio: stats.valid_ratio(),
        }
    }
}

/// Response body for cache maintenance endpoints
#[derive(Debug, Clone, Serialize)]
pub struct RemovedResponse {
    pub message: String,
    pub removed: usize,
}

impl RemovedResponse {
    pub fn new(removed: usize, what: &str) -> Self {
        Self {
            message: format!("Removed {} {}", removed, what),
            removed,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
