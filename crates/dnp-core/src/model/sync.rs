// ── Platform sync runs ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::entity_id::EntityId;
use super::platform::Platform;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SyncStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
    #[default]
    Unknown,
}

impl SyncStatus {
    /// Runs in these states may still be cancelled.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SyncType {
    Full,
    #[default]
    Incremental,
}

/// One sync run of the DNP list against a platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRun {
    pub id: EntityId,
    pub platform: Platform,
    pub sync_type: SyncType,
    pub status: SyncStatus,
    pub artists_processed: u64,
    pub artists_blocked: u64,
    pub error_count: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

/// Latest sync state of one connected platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSyncStatus {
    pub platform: Platform,
    pub status: SyncStatus,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub artists_blocked: u64,
}
