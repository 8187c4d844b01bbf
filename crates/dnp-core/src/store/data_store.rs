// ── Central reactive data store ──
//
// Thread-safe storage for the server-backed state: the DNP list,
// categories and their members, platform connections, sync state and
// the analytics dashboard. Mutations are broadcast via `watch` channels.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::EntityCollection;
use crate::model::{
    Category, CategoryMember, DashboardStats, DnpEntry, EntityId, Platform, PlatformConnection,
    PlatformSyncStatus, SyncRun,
};
use crate::stream::EntityStream;

/// Central reactive store for all backend-owned entities.
///
/// All reads are wait-free, writes use fine-grained per-shard locks
/// within `DashMap`. Client-local state (category exceptions, search
/// results, enforcement operations) lives elsewhere.
pub struct DataStore {
    pub(crate) dnp_entries: EntityCollection<EntityId, DnpEntry>,
    pub(crate) categories: EntityCollection<EntityId, Category>,
    /// Member lists keyed by category id. Only subscribed categories
    /// are fetched.
    pub(crate) category_members: EntityCollection<EntityId, Vec<CategoryMember>>,
    pub(crate) connections: EntityCollection<Platform, PlatformConnection>,
    pub(crate) sync_statuses: EntityCollection<Platform, PlatformSyncStatus>,
    pub(crate) sync_runs: EntityCollection<EntityId, SyncRun>,
    pub(crate) dashboard: watch::Sender<Option<Arc<DashboardStats>>>,
    pub(crate) last_full_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (dashboard, _) = watch::channel(None);
        let (last_full_refresh, _) = watch::channel(None);

        Self {
            dnp_entries: EntityCollection::new(),
            categories: EntityCollection::new(),
            category_members: EntityCollection::new(),
            connections: EntityCollection::new(),
            sync_statuses: EntityCollection::new(),
            sync_runs: EntityCollection::new(),
            dashboard,
            last_full_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn dnp_entries_snapshot(&self) -> Arc<Vec<Arc<DnpEntry>>> {
        self.dnp_entries.snapshot()
    }

    pub fn categories_snapshot(&self) -> Arc<Vec<Arc<Category>>> {
        self.categories.snapshot()
    }

    pub fn connections_snapshot(&self) -> Arc<Vec<Arc<PlatformConnection>>> {
        self.connections.snapshot()
    }

    pub fn sync_statuses_snapshot(&self) -> Arc<Vec<Arc<PlatformSyncStatus>>> {
        self.sync_statuses.snapshot()
    }

    /// Sync runs, most recently started first.
    pub fn sync_runs_snapshot(&self) -> Vec<Arc<SyncRun>> {
        let mut runs: Vec<Arc<SyncRun>> = self.sync_runs.snapshot().iter().cloned().collect();
        runs.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        runs
    }

    pub fn dashboard(&self) -> Option<Arc<DashboardStats>> {
        self.dashboard.borrow().clone()
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn dnp_entry(&self, artist_id: &EntityId) -> Option<Arc<DnpEntry>> {
        self.dnp_entries.get(artist_id)
    }

    pub fn is_directly_blocked(&self, artist_id: &EntityId) -> bool {
        self.dnp_entries.contains(artist_id)
    }

    pub fn category(&self, id: &EntityId) -> Option<Arc<Category>> {
        self.categories.get(id)
    }

    pub fn category_members(&self, category_id: &EntityId) -> Option<Arc<Vec<CategoryMember>>> {
        self.category_members.get(category_id)
    }

    pub fn connection(&self, platform: &Platform) -> Option<Arc<PlatformConnection>> {
        self.connections.get(platform)
    }

    /// Platforms whose connection is currently active, in stable order.
    pub fn active_platforms(&self) -> Vec<Platform> {
        self.connections
            .snapshot()
            .iter()
            .filter(|c| c.status.is_active())
            .map(|c| c.platform.clone())
            .collect()
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn dnp_entry_count(&self) -> usize {
        self.dnp_entries.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn subscribed_category_count(&self) -> usize {
        self.categories
            .snapshot()
            .iter()
            .filter(|c| c.subscribed)
            .count()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_dnp_entries(&self) -> EntityStream<DnpEntry> {
        EntityStream::new(self.dnp_entries.subscribe())
    }

    pub fn subscribe_categories(&self) -> EntityStream<Category> {
        EntityStream::new(self.categories.subscribe())
    }

    pub fn subscribe_category_members(&self) -> EntityStream<Vec<CategoryMember>> {
        EntityStream::new(self.category_members.subscribe())
    }

    pub fn subscribe_connections(&self) -> EntityStream<PlatformConnection> {
        EntityStream::new(self.connections.subscribe())
    }

    pub fn subscribe_sync_statuses(&self) -> EntityStream<PlatformSyncStatus> {
        EntityStream::new(self.sync_statuses.subscribe())
    }

    pub fn subscribe_sync_runs(&self) -> EntityStream<SyncRun> {
        EntityStream::new(self.sync_runs.subscribe())
    }

    pub fn subscribe_dashboard(&self) -> watch::Receiver<Option<Arc<DashboardStats>>> {
        self.dashboard.subscribe()
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_full_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_full_refresh.borrow()
    }

    pub fn subscribe_last_full_refresh(&self) -> watch::Receiver<Option<DateTime<Utc>>> {
        self.last_full_refresh.subscribe()
    }

    /// How long ago the last full refresh occurred, or `None` if never refreshed.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_full_refresh().map(|t| Utc::now() - t)
    }

    /// Drop everything. Used on disconnect so a later session starts clean.
    pub(crate) fn clear(&self) {
        self.dnp_entries.clear();
        self.categories.clear();
        self.category_members.clear();
        self.connections.clear();
        self.sync_statuses.clear();
        self.sync_runs.clear();
        self.dashboard.send_modify(|d| *d = None);
        self.last_full_refresh.send_modify(|t| *t = None);
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
