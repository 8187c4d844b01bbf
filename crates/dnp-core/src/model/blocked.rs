// ── Effective blocklist view ──
//
// The "currently blocked" view is never stored. It is derived on demand
// from the direct DNP entries, the members of subscribed categories and
// the client-local exception set.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::artist::DnpEntry;
use super::category::{Category, CategoryMember};
use super::entity_id::EntityId;

/// Why an artist is blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockSource {
    /// On the user's own DNP list.
    Direct,
    /// Member of a subscribed category.
    Category { id: EntityId, name: String },
}

/// One row of the effective blocklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedArtist {
    pub artist_id: EntityId,
    pub name: String,
    pub sources: Vec<BlockSource>,
}

impl BlockedArtist {
    pub fn is_direct(&self) -> bool {
        self.sources.contains(&BlockSource::Direct)
    }

    /// Comma-separated source labels, e.g. `"direct, Violence"`.
    pub fn source_label(&self) -> String {
        self.sources
            .iter()
            .map(|s| match s {
                BlockSource::Direct => "direct",
                BlockSource::Category { name, .. } => name.as_str(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Compute the effective blocklist:
/// (direct entries ∪ members of subscribed categories) − exceptions.
///
/// `members` maps category id to its member list; categories without a
/// fetched member list contribute nothing. Rows are sorted by name.
pub fn blocked_view<'a>(
    entries: impl IntoIterator<Item = &'a DnpEntry>,
    categories: impl IntoIterator<Item = &'a Category>,
    members: impl Fn(&EntityId) -> Option<std::sync::Arc<Vec<CategoryMember>>>,
    exceptions: &HashSet<EntityId>,
) -> Vec<BlockedArtist> {
    let mut rows: BTreeMap<EntityId, BlockedArtist> = BTreeMap::new();

    for entry in entries {
        if exceptions.contains(&entry.artist_id) {
            continue;
        }
        rows.entry(entry.artist_id.clone())
            .or_insert_with(|| BlockedArtist {
                artist_id: entry.artist_id.clone(),
                name: entry.artist_name.clone(),
                sources: Vec::new(),
            })
            .sources
            .push(BlockSource::Direct);
    }

    for category in categories.into_iter().filter(|c| c.subscribed) {
        let Some(list) = members(&category.id) else {
            continue;
        };
        for member in list.iter() {
            if exceptions.contains(&member.artist_id) {
                continue;
            }
            rows.entry(member.artist_id.clone())
                .or_insert_with(|| BlockedArtist {
                    artist_id: member.artist_id.clone(),
                    name: member.name.clone(),
                    sources: Vec::new(),
                })
                .sources
                .push(BlockSource::Category {
                    id: category.id.clone(),
                    name: category.name.clone(),
                });
        }
    }

    let mut out: Vec<BlockedArtist> = rows.into_values().collect();
    out.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;

    fn entry(id: &str, name: &str) -> DnpEntry {
        DnpEntry {
            artist_id: EntityId::from(id),
            artist_name: name.into(),
            tags: Vec::new(),
            note: None,
            created_at: Utc::now(),
            image_url: None,
            genres: Vec::new(),
        }
    }

    fn category(id: &str, name: &str, subscribed: bool) -> Category {
        Category {
            id: EntityId::from(id),
            name: name.into(),
            description: None,
            artist_count: 0,
            subscribed,
        }
    }

    fn member(id: &str, name: &str) -> CategoryMember {
        CategoryMember {
            artist_id: EntityId::from(id),
            name: name.into(),
            genres: Vec::new(),
            image_url: None,
        }
    }

    fn members_of(
        map: &HashMap<EntityId, Arc<Vec<CategoryMember>>>,
    ) -> impl Fn(&EntityId) -> Option<Arc<Vec<CategoryMember>>> + '_ {
        move |id| map.get(id).cloned()
    }

    #[test]
    fn merges_direct_and_category_sources() {
        let entries = [entry("a1", "Alpha")];
        let cats = [category("c1", "Violence", true)];
        let mut map = HashMap::new();
        map.insert(
            EntityId::from("c1"),
            Arc::new(vec![member("a1", "Alpha"), member("a2", "Beta")]),
        );

        let view = blocked_view(&entries, &cats, members_of(&map), &HashSet::new());

        assert_eq!(view.len(), 2);
        assert_eq!(view[0].name, "Alpha");
        assert!(view[0].is_direct());
        assert_eq!(view[0].source_label(), "direct, Violence");
        assert_eq!(view[1].name, "Beta");
        assert!(!view[1].is_direct());
    }

    #[test]
    fn unsubscribed_categories_contribute_nothing() {
        let cats = [category("c1", "Violence", false)];
        let mut map = HashMap::new();
        map.insert(EntityId::from("c1"), Arc::new(vec![member("a2", "Beta")]));

        let view = blocked_view(&Vec::<DnpEntry>::new(), &cats, members_of(&map), &HashSet::new());
        assert!(view.is_empty());
    }

    #[test]
    fn exceptions_hide_artists_from_every_source() {
        let entries = [entry("a1", "Alpha")];
        let cats = [category("c1", "Violence", true)];
        let mut map = HashMap::new();
        map.insert(EntityId::from("c1"), Arc::new(vec![member("a1", "Alpha")]));
        let exceptions: HashSet<EntityId> = [EntityId::from("a1")].into_iter().collect();

        let view = blocked_view(&entries, &cats, members_of(&map), &exceptions);
        assert!(view.is_empty());
    }
}
