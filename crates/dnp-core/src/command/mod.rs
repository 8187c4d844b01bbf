// ── Command API ──
//
// All write operations flow through a unified `Command` enum. The
// controller's command processor applies optimistic store updates,
// calls the backend and kicks off enforcement where needed.

pub mod requests;

use crate::error::CoreError;
use crate::model::{Category, DnpEntry, EntityId, Evidence, Offense, Platform, Report, SyncRun};

pub use requests::{CreateOffenseReportRequest, EvidenceInput, OffenseFilter, ReportRequest};

/// A command envelope sent through the command channel.
/// Contains the command and a oneshot response channel.
pub(crate) struct CommandEnvelope {
    pub command: Command,
    pub response_tx: tokio::sync::oneshot::Sender<Result<CommandResult, CoreError>>,
}

/// All write operations a user can perform.
#[derive(Debug, Clone)]
pub enum Command {
    // ── DNP list ─────────────────────────────────────────────────────
    /// Add an artist to the DNP list. Clears any category exception for
    /// the artist and starts enforcement on active connections.
    BlockArtist {
        artist_id: EntityId,
        artist_name: String,
        tags: Vec<String>,
        note: Option<String>,
    },
    /// Remove an artist from the DNP list and start unblock enforcement.
    UnblockArtist {
        artist_id: EntityId,
    },
    UpdateEntry {
        artist_id: EntityId,
        tags: Option<Vec<String>>,
        note: Option<String>,
    },

    // ── Categories ───────────────────────────────────────────────────
    SubscribeCategory {
        id: EntityId,
    },
    UnsubscribeCategory {
        id: EntityId,
    },
    /// Keep a category-blocked artist unblocked (client-local).
    ExceptArtist {
        artist_id: EntityId,
    },
    /// Drop a category exception (client-local).
    ReblockArtist {
        artist_id: EntityId,
    },

    // ── Offenses ─────────────────────────────────────────────────────
    SubmitOffenseReport(CreateOffenseReportRequest),
    AddEvidence {
        offense_id: EntityId,
        evidence: EvidenceInput,
    },

    // ── Platforms and sync ───────────────────────────────────────────
    /// Trigger a sync. An empty platform list syncs every connection.
    TriggerSync {
        platforms: Vec<Platform>,
        full: bool,
    },
    CancelSync {
        run_id: EntityId,
    },
    DisconnectPlatform {
        platform: Platform,
    },

    // ── Analytics ────────────────────────────────────────────────────
    GenerateReport(ReportRequest),
}

/// Result of a command execution.
#[derive(Debug)]
pub enum CommandResult {
    Ok,
    DnpEntry(DnpEntry),
    Category(Category),
    Offense(Offense),
    Evidence(Evidence),
    SyncRuns(Vec<SyncRun>),
    Report(Report),
}
