//! Request DTOs for the gateway API
//!
//! Defines the structure of incoming query strings and request bodies.

use serde::Deserialize;

use crate::team::TeamMember;

/// Query string for the species list (GET /pokemon)
///
/// # Fields
/// - `limit`: Number of species to list (server default if not specified)
/// - `refresh`: Bypass the cache and refetch
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub refresh: bool,
}

/// Query string for detail lookups (GET /pokemon/name/:name, /pokemon/id/:id)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// Request body for toggling a team member (POST /team/toggle)
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleRequest {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl ToggleRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.id == 0 {
            return Some("Id must be a positive number".to_string());
        }
        if self.name.trim().is_empty() {
            return Some("Name cannot be empty".to_string());
        }
        None
    }

    /// Converts into a roster member, defaulting the image to the official artwork.
    pub fn into_member(self) -> TeamMember {
        let image = self
            .image
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| crate::catalog::official_artwork_url(self.id));
        TeamMember {
            id: self.id,
            name: self.name,
            image,
        }
    }
}
