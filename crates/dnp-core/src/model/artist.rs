// ── Artist and DNP list domain types ──

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::offense::{OffenseSummary, Severity};
use super::platform::Platform;

/// One hit of an artist search. Ephemeral: replaced by the next query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistSearchResult {
    pub id: EntityId,
    pub name: String,
    pub genres: Vec<String>,
    pub image_url: Option<String>,
    pub has_offenses: bool,
    pub offense_count: u32,
    pub max_severity: Option<Severity>,
}

/// Full artist profile with documented offenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: EntityId,
    pub name: String,
    pub genres: Vec<String>,
    pub image_url: Option<String>,
    pub external_ids: HashMap<Platform, String>,
    pub offenses: Vec<OffenseSummary>,
}

/// An entry of the user's do-not-play list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnpEntry {
    pub artist_id: EntityId,
    pub artist_name: String,
    pub tags: Vec<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub genres: Vec<String>,
}
