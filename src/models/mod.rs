//! Request and Response models for the gateway API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP bodies and cached catalog records.

pub mod pokemon;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use pokemon::{NamedResource, PokemonDetails, PokemonListItem, Sprites, StatSlot, TypeSlot};
pub use requests::{ListQuery, RefreshQuery, ToggleRequest};
pub use responses::{
    ErrorResponse, HealthResponse, ListEntry, ListResponse, RemovedResponse, StatsResponse,
    TeamResponse,
};
