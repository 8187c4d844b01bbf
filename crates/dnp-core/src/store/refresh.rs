// ── Refresh and incremental update logic ──
//
// Applies bulk snapshots fetched from the backend, plus the targeted
// mutations the command processor performs (optimistic updates, their
// reverts, and post-command refetches).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;

use super::DataStore;
use crate::model::{
    Category, CategoryMember, DashboardStats, DnpEntry, EntityId, PlatformConnection,
    PlatformSyncStatus, SyncRun,
};

/// All collections fetched during a single refresh cycle.
///
/// The DNP list, categories and connections are required. The remaining
/// fields are `None` when their fetch failed; the store then keeps the
/// previously known values.
#[derive(Debug, Default)]
pub(crate) struct RefreshSnapshot {
    pub dnp_entries: Vec<DnpEntry>,
    pub categories: Vec<Category>,
    pub connections: Vec<PlatformConnection>,
    /// Members of subscribed categories, keyed by category id.
    pub category_members: HashMap<EntityId, Vec<CategoryMember>>,
    pub sync_statuses: Option<Vec<PlatformSyncStatus>>,
    pub sync_runs: Option<Vec<SyncRun>>,
    pub dashboard: Option<DashboardStats>,
}

impl DataStore {
    /// Apply a full refresh.
    ///
    /// Each collection is replaced with upsert-then-prune semantics, so
    /// subscribers never see a transient empty list.
    pub(crate) fn apply_snapshot(&self, snap: RefreshSnapshot) {
        self.dnp_entries.replace_all(
            snap.dnp_entries
                .into_iter()
                .map(|e| (e.artist_id.clone(), e)),
        );
        self.categories
            .replace_all(snap.categories.into_iter().map(|c| (c.id.clone(), c)));
        self.connections
            .replace_all(snap.connections.into_iter().map(|c| (c.platform.clone(), c)));
        self.category_members
            .replace_all(snap.category_members.into_iter());

        if let Some(statuses) = snap.sync_statuses {
            self.sync_statuses
                .replace_all(statuses.into_iter().map(|s| (s.platform.clone(), s)));
        }
        if let Some(runs) = snap.sync_runs {
            self.sync_runs
                .replace_all(runs.into_iter().map(|r| (r.id.clone(), r)));
        }
        if let Some(stats) = snap.dashboard {
            self.dashboard.send_modify(|d| *d = Some(Arc::new(stats)));
        }

        self.last_full_refresh.send_modify(|t| *t = Some(Utc::now()));
    }

    // ── DNP list ─────────────────────────────────────────────────────

    pub(crate) fn upsert_dnp_entry(&self, entry: DnpEntry) {
        self.dnp_entries.upsert(entry.artist_id.clone(), entry);
    }

    pub(crate) fn remove_dnp_entry(&self, artist_id: &EntityId) -> Option<Arc<DnpEntry>> {
        self.dnp_entries.remove(artist_id)
    }

    // ── Categories ───────────────────────────────────────────────────

    /// Flip the subscription flag of a category, adjusting nothing else.
    /// Returns the previous value, or `None` if the category is unknown.
    pub(crate) fn set_category_subscribed(&self, id: &EntityId, subscribed: bool) -> Option<bool> {
        let previous = self.categories.get(id).map(|c| c.subscribed)?;
        self.categories.modify(id, |c| c.subscribed = subscribed);
        Some(previous)
    }

    pub(crate) fn set_category_members(&self, id: EntityId, members: Vec<CategoryMember>) {
        self.category_members.upsert(id, members);
    }

    pub(crate) fn remove_category_members(&self, id: &EntityId) {
        self.category_members.remove(id);
    }

    // ── Connections and sync ─────────────────────────────────────────

    pub(crate) fn replace_connections(&self, connections: Vec<PlatformConnection>) {
        self.connections
            .replace_all(connections.into_iter().map(|c| (c.platform.clone(), c)));
    }

    pub(crate) fn upsert_sync_run(&self, run: SyncRun) {
        self.sync_runs.upsert(run.id.clone(), run);
    }

    pub(crate) fn replace_sync_runs(&self, runs: Vec<SyncRun>) {
        self.sync_runs
            .replace_all(runs.into_iter().map(|r| (r.id.clone(), r)));
    }

    pub(crate) fn replace_sync_statuses(&self, statuses: Vec<PlatformSyncStatus>) {
        self.sync_statuses
            .replace_all(statuses.into_iter().map(|s| (s.platform.clone(), s)));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{ConnectionStatus, Platform};

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

    fn category(id: &str, subscribed: bool) -> Category {
        Category {
            id: EntityId::from(id),
            name: id.to_uppercase(),
            description: None,
            artist_count: 0,
            subscribed,
        }
    }

    #[test]
    fn snapshot_replaces_and_stamps_refresh_time() {
        let store = DataStore::new();
        store.upsert_dnp_entry(entry("stale", "Stale"));
        assert!(store.last_full_refresh().is_none());

        store.apply_snapshot(RefreshSnapshot {
            dnp_entries: vec![entry("a1", "Alpha")],
            categories: vec![category("c1", true)],
            connections: vec![PlatformConnection {
                platform: Platform::Spotify,
                status: ConnectionStatus::Active,
                display_name: None,
                connected_at: None,
                last_health_check: None,
                error_message: None,
            }],
            ..RefreshSnapshot::default()
        });

        assert_eq!(store.dnp_entry_count(), 1);
        assert!(store.is_directly_blocked(&EntityId::from("a1")));
        assert!(!store.is_directly_blocked(&EntityId::from("stale")));
        assert_eq!(store.active_platforms(), vec![Platform::Spotify]);
        assert!(store.last_full_refresh().is_some());
    }

    #[test]
    fn failed_optional_fetches_keep_previous_values() {
        let store = DataStore::new();
        store.apply_snapshot(RefreshSnapshot {
            dashboard: Some(DashboardStats {
                total_blocked: 7,
                ..DashboardStats::default()
            }),
            ..RefreshSnapshot::default()
        });

        store.apply_snapshot(RefreshSnapshot::default());
        assert_eq!(store.dashboard().unwrap().total_blocked, 7);
    }

    #[test]
    fn subscription_flag_reports_previous_value() {
        let store = DataStore::new();
        store.apply_snapshot(RefreshSnapshot {
            categories: vec![category("c1", false)],
            ..RefreshSnapshot::default()
        });

        let id = EntityId::from("c1");
        assert_eq!(store.set_category_subscribed(&id, true), Some(false));
        assert!(store.category(&id).unwrap().subscribed);
        assert_eq!(store.subscribed_category_count(), 1);
        assert_eq!(
            store.set_category_subscribed(&EntityId::from("nope"), true),
            None
        );
    }
}
