// ── Domain model ──
//
// Canonical types the CLI and TUI consume. Wire types from `dnp-api`
// are converted into these in `convert.rs`.

pub mod analytics;
pub mod artist;
pub mod blocked;
pub mod category;
pub mod entity_id;
pub mod offense;
pub mod platform;
pub mod sync;
pub mod user;

pub use analytics::{DashboardStats, Report, ReportFormat, ReportStatus, ReportType, TrendPoint};
pub use artist::{Artist, ArtistSearchResult, DnpEntry};
pub use blocked::{BlockSource, BlockedArtist, blocked_view};
pub use category::{Category, CategoryMember};
pub use entity_id::EntityId;
pub use offense::{Evidence, EvidenceTier, Offense, OffenseSummary, ProceduralState, Severity};
pub use platform::{ConnectionStatus, Platform, PlatformConnection};
pub use sync::{PlatformSyncStatus, SyncRun, SyncStatus, SyncType};
pub use user::User;
