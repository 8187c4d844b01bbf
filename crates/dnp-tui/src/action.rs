//! Every state transition in the TUI is expressed as an [`Action`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use dnp_core::{
    Artist, BlockedArtist, Category, CategoryMember, DashboardStats, DnpEntry,
    EnforcementOperation, EntityId, Offense, OffenseFilter, Platform, PlatformConnection,
    PlatformSyncStatus, ReportType, SearchState, SyncRun, Toast, ToastLevel, TrendPoint,
};

use crate::screen::ScreenId;

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast shown in the bottom-right corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }
}

impl From<Toast> for Notification {
    fn from(toast: Toast) -> Self {
        let level = match toast.level {
            ToastLevel::Info => NotificationLevel::Info,
            ToastLevel::Success => NotificationLevel::Success,
            ToastLevel::Error => NotificationLevel::Error,
        };
        Self {
            message: toast.message,
            level,
        }
    }
}

// ── Supporting types ─────────────────────────────────────────────────

/// An excepted artist, with the name resolved from category member
/// lists when one is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptedArtist {
    pub artist_id: EntityId,
    pub name: Option<String>,
}

impl ExceptedArtist {
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.artist_id.to_string())
    }
}

/// Actions that need a y/n confirmation before running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Unblock { artist_id: EntityId, name: String },
    Unsubscribe { id: EntityId, name: String },
    Disconnect { platform: Platform },
    CancelSync { run_id: EntityId },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unblock { name, .. } => write!(f, "Remove {name} from your DNP list?"),
            Self::Unsubscribe { name, .. } => {
                write!(f, "Unsubscribe from {name}? Its artists become playable.")
            }
            Self::Disconnect { platform } => {
                write!(f, "Disconnect {}?", platform.display_name())
            }
            Self::CancelSync { run_id } => write!(f, "Cancel sync run {run_id}?"),
        }
    }
}

// ── Action ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Connection ────────────────────────────────────────────────
    Connecting,
    Connected,
    Disconnected(String),

    // ── Data events (from the data bridge) ────────────────────────
    DnpEntriesUpdated(Arc<Vec<Arc<DnpEntry>>>),
    BlockedViewUpdated(Arc<Vec<BlockedArtist>>),
    CategoriesUpdated(Arc<Vec<Arc<Category>>>),
    ExceptionsUpdated(Arc<HashSet<EntityId>>, Arc<Vec<ExceptedArtist>>),
    ConnectionsUpdated(Arc<Vec<Arc<PlatformConnection>>>),
    SyncStatusesUpdated(Arc<Vec<Arc<PlatformSyncStatus>>>),
    SyncRunsUpdated(Arc<Vec<Arc<SyncRun>>>),
    DashboardUpdated(Option<Arc<DashboardStats>>),
    EnforcementUpdated(Arc<Vec<EnforcementOperation>>),
    SearchUpdated(SearchState),

    // ── Ad-hoc loads ──────────────────────────────────────────────
    LoadCategoryMembers(EntityId),
    CategoryMembersLoaded(EntityId, Arc<Vec<CategoryMember>>),
    LoadOffenses(OffenseFilter),
    OffensesLoaded(Arc<Vec<Offense>>),
    LoadOffense(EntityId),
    OffenseLoaded(Box<Offense>),
    LoadArtist(EntityId),
    ArtistLoaded(Box<Artist>),
    LoadTrends(u32),
    TrendsLoaded(u32, Arc<Vec<TrendPoint>>),
    /// Jump to the offenses screen filtered to one artist.
    ShowArtistOffenses { artist_id: EntityId, name: String },
    RefreshAll,

    // ── Search ────────────────────────────────────────────────────
    SearchInput(String),

    // ── Commands ──────────────────────────────────────────────────
    RequestBlock { artist_id: EntityId, name: String },
    RequestUnblock { artist_id: EntityId, name: String },
    RequestSubscribe { id: EntityId, name: String },
    RequestUnsubscribe { id: EntityId, name: String },
    RequestExcept { artist_id: EntityId, name: String },
    RequestReblock { artist_id: EntityId, name: String },
    RequestSync { full: bool },
    RequestCancelSync(EntityId),
    RequestDisconnect(Platform),
    RequestReport(ReportType),

    // ── Confirm dialog ────────────────────────────────────────────
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn core_toasts_keep_level_and_message() {
        let toast = Toast {
            level: ToastLevel::Error,
            message: "Blocking X failed on Spotify".into(),
        };
        assert_eq!(
            Notification::from(toast),
            Notification::error("Blocking X failed on Spotify")
        );
    }

    #[test]
    fn excepted_artist_falls_back_to_id() {
        let unnamed = ExceptedArtist {
            artist_id: EntityId::from("a9"),
            name: None,
        };
        assert_eq!(unnamed.label(), "a9");
    }
}
