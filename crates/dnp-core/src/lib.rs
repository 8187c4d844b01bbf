//! Reactive state layer between `dnp-api` and UI consumers (CLI / TUI).
//!
//! This crate owns the business logic, domain model, and reactive data
//! infrastructure for the dnp workspace:
//!
//! - **[`Controller`]** -- Central facade managing the session lifecycle:
//!   [`connect()`](Controller::connect) authenticates, fetches an initial data
//!   snapshot, then spawns background tasks for periodic refresh and command
//!   processing. [`Controller::oneshot()`](Controller::oneshot) provides a
//!   lightweight mode for single CLI invocations.
//!
//! - **[`DataStore`]** -- Reactive storage built on `EntityCollection<K, T>`
//!   (`DashMap` + `tokio::sync::watch` channels) for the DNP list,
//!   categories, connections and sync state.
//!
//! - **[`EntityStream<T>`]** -- Subscription handle vended by the `DataStore`.
//!   Exposes `current()` / `latest()` / `changed()` for reactive rendering.
//!
//! - **[`Command`]** -- Typed mutation requests routed through an `mpsc`
//!   channel to the controller's command processor, with optimistic store
//!   updates that are reverted when the backend rejects them.
//!
//! - **[`EnforcementTracker`]** -- Per-platform progress of block/unblock
//!   jobs, polled from the backend, plus completion toasts.
//!
//! - **[`SearchDebouncer`]** -- Debounced artist search that drops stale
//!   responses.
//!
//! - **[`ExceptionStore`]** -- Client-local exceptions to category
//!   subscriptions, persisted as a JSON array of artist ids.

pub mod command;
pub mod config;
pub mod controller;
pub mod enforcement;
pub mod error;
pub mod exceptions;
pub mod model;
pub mod search;
pub mod store;
pub mod stream;

mod convert;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{Command, CommandResult};
pub use config::{AuthCredentials, ControllerConfig, TlsVerification};
pub use controller::{ConnectionState, Controller};
pub use enforcement::{
    EnforcementAction, EnforcementOperation, EnforcementTarget, EnforcementTicket,
    EnforcementTracker, PlatformProgress, PlatformStatus, Toast, ToastLevel,
};
pub use error::CoreError;
pub use exceptions::ExceptionStore;
pub use search::{SearchDebouncer, SearchState};
pub use store::DataStore;
pub use stream::EntityStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Artists and the DNP list
    Artist,
    ArtistSearchResult,
    // Blocklist view
    BlockSource,
    BlockedArtist,
    // Categories
    Category,
    CategoryMember,
    // Platforms
    ConnectionStatus,
    // Analytics
    DashboardStats,
    DnpEntry,
    EntityId,
    // Offenses
    Evidence,
    EvidenceTier,
    Offense,
    OffenseSummary,
    Platform,
    PlatformConnection,
    // Sync
    PlatformSyncStatus,
    ProceduralState,
    Report,
    ReportFormat,
    ReportStatus,
    ReportType,
    Severity,
    SyncRun,
    SyncStatus,
    SyncType,
    TrendPoint,
    User,
    blocked_view,
};
