//! Team Module
//!
//! The user's roster: an ordered list of at most six species, persisted as a
//! JSON array in the key-value store. Persistence problems never surface to
//! the caller; an unreadable roster simply loads as empty.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::KvStore;

// == Public Constants ==
/// Maximum number of members on a team
pub const TEAM_MAX: usize = 6;

/// Store key holding the persisted roster (outside the cache namespace)
pub const TEAM_KEY: &str = "pokedex_team_v1";

// == Team Member ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: u32,
    pub name: String,
    pub image: String,
}

// == Team ==
/// Capped roster with toggle semantics.
pub struct Team {
    store: Arc<dyn KvStore>,
    members: Vec<TeamMember>,
}

impl Team {
    // == Load ==
    /// Loads the roster from `store`, starting empty if nothing usable is there.
    pub fn load(store: Arc<dyn KvStore>) -> Self {
        let members = match store.get(TEAM_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<Vec<TeamMember>>(&raw).unwrap_or_else(|e| {
                warn!("Stored team is unreadable ({}), starting empty", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read stored team: {}", e);
                Vec::new()
            }
        };

        debug!("Loaded team with {} members", members.len());
        Self { store, members }
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= TEAM_MAX
    }

    pub fn contains(&self, id: u32) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    // == Toggle ==
    /// Removes `member` if present, otherwise appends it.
    ///
    /// Returns `false` only when adding was refused because the team is full.
    pub fn toggle(&mut self, member: TeamMember) -> bool {
        if self.contains(member.id) {
            self.members.retain(|m| m.id != member.id);
            self.save();
            return true;
        }

        if self.is_full() {
            return false;
        }

        self.members.push(member);
        self.save();
        true
    }

    // == Remove ==
    pub fn remove(&mut self, id: u32) {
        let before = self.members.len();
        self.members.retain(|m| m.id != id);
        if self.members.len() != before {
            self.save();
        }
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.members.clear();
        self.save();
    }

    fn save(&self) {
        let raw = match serde_json::to_string(&self.members) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize team: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(TEAM_KEY, &raw) {
            warn!("Failed to persist team: {}", e);
        }
    }
}
