// ── Misconduct categories ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A curated grouping of artists sharing a misconduct classification.
///
/// Subscribing bulk-blocks every member server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub artist_count: u32,
    pub subscribed: bool,
}

/// A member artist of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMember {
    pub artist_id: EntityId,
    pub name: String,
    pub genres: Vec<String>,
    pub image_url: Option<String>,
}
