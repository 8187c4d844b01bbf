// ── Enforcement operation tracker ──
//
// Tracks the per-platform progress of block/unblock enforcement for each
// artist or category toggle. Progress comes from the backend's enforcement jobs: the
// controller posts `enforcement/run` and `drive_job` polls the job until
// every platform is terminal or the deadline passes.
//
// Operations are client-only state. A failed platform never rolls back
// the DNP list mutation that triggered it.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::{broadcast, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use dnp_api::DnpClient;
use dnp_api::models::{EnforcementJobItem, EnforcementRunRequest};

use crate::model::{EntityId, Platform};

const TOAST_CHANNEL_SIZE: usize = 64;

/// Message used when a job does not finish before the poll deadline.
pub const TIMEOUT_MESSAGE: &str = "timed out waiting for enforcement";

// ── Toasts ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

/// A transient, purely presentational notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

// ── Operation types ──────────────────────────────────────────────────

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EnforcementAction {
    Block,
    Unblock,
}

impl EnforcementAction {
    fn progressive(self) -> &'static str {
        match self {
            Self::Block => "Blocking",
            Self::Unblock => "Unblocking",
        }
    }

    fn past(self) -> &'static str {
        match self {
            Self::Block => "Blocked",
            Self::Unblock => "Unblocked",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlatformStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl PlatformStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Map a backend job status onto the tracker's states.
    /// Unrecognized values are treated as still pending.
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "running" | "in_progress" | "processing" => Self::InProgress,
            "completed" | "complete" | "succeeded" | "success" | "done" => Self::Completed,
            "failed" | "error" | "cancelled" => Self::Failed,
            _ => Self::Pending,
        }
    }
}

/// What an enforcement operation pushes out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnforcementTarget {
    Artist(EntityId),
    /// Every member of a category, enforced as one backend job.
    Category(EntityId),
}

impl EnforcementTarget {
    pub fn id(&self) -> &EntityId {
        match self {
            Self::Artist(id) | Self::Category(id) => id,
        }
    }
}

impl From<EntityId> for EnforcementTarget {
    fn from(artist_id: EntityId) -> Self {
        Self::Artist(artist_id)
    }
}

impl fmt::Display for EnforcementTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Artist(id) => write!(f, "artist {id}"),
            Self::Category(id) => write!(f, "category {id}"),
        }
    }
}

/// Handle for the job driving one specific operation.
///
/// Operations are replaced when the same target is toggled again; the
/// generation tells a late answer for the old job apart from the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcementTicket {
    pub target: EnforcementTarget,
    pub generation: u64,
    pub action: EnforcementAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProgress {
    pub status: PlatformStatus,
    pub error: Option<String>,
}

/// Enforcement of one block/unblock across the user's platforms.
#[derive(Debug, Clone, PartialEq)]
pub struct EnforcementOperation {
    pub target: EnforcementTarget,
    /// Artist or category name, for display.
    pub name: String,
    pub action: EnforcementAction,
    /// Increases with every `start`; see [`EnforcementTicket`].
    pub generation: u64,
    pub platforms: BTreeMap<Platform, PlatformProgress>,
    /// Backend job id, once `enforcement/run` has answered.
    pub job_id: Option<EntityId>,
    pub started_at: Instant,
    pub completed_at: Option<Instant>,
}

impl EnforcementOperation {
    /// "Alpha" for an artist, "category Hate speech" for a category.
    pub fn label(&self) -> String {
        label(&self.target, &self.name)
    }

    /// True once every platform is terminal.
    pub fn is_complete(&self) -> bool {
        self.platforms.values().all(|p| p.status.is_terminal())
    }

    /// Fraction of platforms in a terminal state, `0.0 ..= 1.0`.
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        if self.platforms.is_empty() {
            return 1.0;
        }
        let done = self
            .platforms
            .values()
            .filter(|p| p.status.is_terminal())
            .count();
        done as f64 / self.platforms.len() as f64
    }

    pub fn failed_platforms(&self) -> Vec<&Platform> {
        self.platforms
            .iter()
            .filter(|(_, p)| p.status == PlatformStatus::Failed)
            .map(|(platform, _)| platform)
            .collect()
    }

    fn completion_toast(&self) -> Toast {
        let failed = self.failed_platforms();
        if failed.is_empty() {
            Toast::new(
                ToastLevel::Success,
                format!(
                    "{} {} on {}",
                    self.action.past(),
                    self.label(),
                    platform_count(self.platforms.len())
                ),
            )
        } else {
            let names: Vec<&str> = failed.iter().map(|p| p.display_name()).collect();
            Toast::new(
                ToastLevel::Error,
                format!(
                    "{} {} failed on {}",
                    self.action.progressive(),
                    self.label(),
                    names.join(", ")
                ),
            )
        }
    }
}

fn label(target: &EnforcementTarget, name: &str) -> String {
    match target {
        EnforcementTarget::Artist(_) => name.to_owned(),
        EnforcementTarget::Category(_) => format!("category {name}"),
    }
}

fn platform_count(n: usize) -> String {
    if n == 1 {
        "1 platform".into()
    } else {
        format!("{n} platforms")
    }
}

// ── Tracker ──────────────────────────────────────────────────────────

/// Registry of in-flight and recently finished enforcement operations.
///
/// At most one operation per target. Every mutation republishes the
/// operation list on a `watch` channel; toasts go out on a `broadcast`
/// channel and are dropped when nobody listens.
pub struct EnforcementTracker {
    operations: Mutex<HashMap<EnforcementTarget, EnforcementOperation>>,
    next_generation: AtomicU64,
    snapshot: watch::Sender<Arc<Vec<EnforcementOperation>>>,
    toasts: broadcast::Sender<Toast>,
    display_timeout: Duration,
}

impl EnforcementTracker {
    pub fn new(display_timeout: Duration) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        let (toasts, _) = broadcast::channel(TOAST_CHANNEL_SIZE);
        Self {
            operations: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(1),
            snapshot,
            toasts,
            display_timeout,
        }
    }

    /// Register a new operation with every platform pending.
    ///
    /// Returns `false` (and tracks nothing) for an empty platform list.
    /// An existing operation for the same target is replaced.
    pub fn start(
        &self,
        target: impl Into<EnforcementTarget>,
        name: impl Into<String>,
        action: EnforcementAction,
        platforms: Vec<Platform>,
    ) -> bool {
        self.begin(target.into(), name, action, platforms).is_some()
    }

    /// Like [`start`](Self::start), returning the ticket a job driver
    /// uses to report into this exact operation.
    pub fn begin(
        &self,
        target: EnforcementTarget,
        name: impl Into<String>,
        action: EnforcementAction,
        platforms: Vec<Platform>,
    ) -> Option<EnforcementTicket> {
        if platforms.is_empty() {
            debug!(subject = %target, "no platforms to enforce on");
            return None;
        }

        let name = name.into();
        let platforms: BTreeMap<Platform, PlatformProgress> = platforms
            .into_iter()
            .map(|p| {
                (
                    p,
                    PlatformProgress {
                        status: PlatformStatus::Pending,
                        error: None,
                    },
                )
            })
            .collect();

        let toast = Toast::new(
            ToastLevel::Info,
            format!(
                "{} {} on {}",
                action.progressive(),
                label(&target, &name),
                platform_count(platforms.len())
            ),
        );

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let operation = EnforcementOperation {
            target: target.clone(),
            name,
            action,
            generation,
            platforms,
            job_id: None,
            started_at: Instant::now(),
            completed_at: None,
        };

        info!(
            subject = %target,
            %action,
            generation,
            platforms = operation.platforms.len(),
            "enforcement started"
        );
        self.with_operations(|ops| {
            ops.insert(target.clone(), operation);
        });
        self.emit(toast);
        Some(EnforcementTicket {
            target,
            generation,
            action,
        })
    }

    /// Remember the backend job driving an operation. Ignored when the
    /// operation has been replaced since the ticket was issued.
    pub fn set_job(&self, ticket: &EnforcementTicket, job_id: EntityId) {
        self.with_operations(|ops| {
            if let Some(op) = ticketed(ops, ticket) {
                op.job_id = Some(job_id);
            }
        });
    }

    /// Transition one platform. Unknown artists/platforms and updates to
    /// already-terminal platforms are ignored. Completes the operation
    /// automatically once the last platform is terminal.
    pub fn update_platform_status(
        &self,
        target: &EnforcementTarget,
        platform: &Platform,
        status: PlatformStatus,
        error: Option<String>,
    ) {
        let toast = self.with_operations(|ops| {
            let op = ops.get_mut(target)?;
            if !apply_status(op, platform, status, error) {
                return None;
            }
            finish_if_done(op)
        });
        if let Some(toast) = toast {
            self.emit(toast);
        }
    }

    /// Fold a polled backend job into its operation.
    ///
    /// Jobs for an operation that has since been replaced are ignored.
    /// Returns `true` when the operation is complete, gone or replaced.
    pub fn apply_job(&self, ticket: &EnforcementTicket, job: &EnforcementJobItem) -> bool {
        let job_id = EntityId::from(job.id.as_str());
        let (done, toast) = self.with_operations(|ops| {
            let Some(op) = ticketed(ops, ticket) else {
                return (true, None);
            };
            if op.job_id.as_ref().is_some_and(|id| *id != job_id) {
                return (true, None);
            }
            for progress in &job.platforms {
                apply_status(
                    op,
                    &Platform::from(progress.platform.as_str()),
                    PlatformStatus::from_wire(&progress.status),
                    progress.error_message.clone(),
                );
            }
            let toast = finish_if_done(op);
            (op.is_complete(), toast)
        });
        if let Some(toast) = toast {
            self.emit(toast);
        }
        done
    }

    /// Mark every non-terminal platform as failed with `message`.
    pub fn fail_remaining(&self, ticket: &EnforcementTicket, message: &str) {
        let toast = self.with_operations(|ops| {
            let op = ticketed(ops, ticket)?;
            for progress in op.platforms.values_mut() {
                if !progress.status.is_terminal() {
                    progress.status = PlatformStatus::Failed;
                    progress.error = Some(message.to_owned());
                }
            }
            finish_if_done(op)
        });
        if let Some(toast) = toast {
            self.emit(toast);
        }
    }

    /// Mark an operation complete. Only honored when every platform is
    /// terminal; returns whether the operation is now complete.
    pub fn complete(&self, target: &EnforcementTarget) -> bool {
        let (complete, toast) = self.with_operations(|ops| match ops.get_mut(target) {
            Some(op) if op.is_complete() => (true, finish_if_done(op)),
            _ => (false, None),
        });
        if let Some(toast) = toast {
            self.emit(toast);
        }
        complete
    }

    /// Remove completed operations whose display timeout has elapsed.
    pub fn prune(&self, now: Instant) {
        let timeout = self.display_timeout;
        let mut removed = false;
        {
            let mut ops = self
                .operations
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            ops.retain(|_, op| {
                let keep = op.completed_at.is_none_or(|done| done + timeout > now);
                removed |= !keep;
                keep
            });
            if removed {
                self.publish(&ops);
            }
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn operation(&self, target: &EnforcementTarget) -> Option<EnforcementOperation> {
        self.operations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(target)
            .cloned()
    }

    /// All tracked operations, oldest first.
    pub fn operations(&self) -> Arc<Vec<EnforcementOperation>> {
        self.snapshot.borrow().clone()
    }

    pub fn has_active(&self) -> bool {
        self.operations().iter().any(|op| !op.is_complete())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<EnforcementOperation>>> {
        self.snapshot.subscribe()
    }

    pub fn subscribe_toasts(&self) -> broadcast::Receiver<Toast> {
        self.toasts.subscribe()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn with_operations<R>(
        &self,
        f: impl FnOnce(&mut HashMap<EnforcementTarget, EnforcementOperation>) -> R,
    ) -> R {
        let mut ops = self
            .operations
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let out = f(&mut ops);
        self.publish(&ops);
        out
    }

    fn publish(&self, ops: &HashMap<EnforcementTarget, EnforcementOperation>) {
        let mut list: Vec<EnforcementOperation> = ops.values().cloned().collect();
        list.sort_by_key(|op| op.started_at);
        self.snapshot.send_modify(|snap| *snap = Arc::new(list));
    }

    fn emit(&self, toast: Toast) {
        // No subscribers is fine: toasts are presentational.
        let _ = self.toasts.send(toast);
    }
}

/// The operation `ticket` was issued for, if it has not been replaced.
fn ticketed<'a>(
    ops: &'a mut HashMap<EnforcementTarget, EnforcementOperation>,
    ticket: &EnforcementTicket,
) -> Option<&'a mut EnforcementOperation> {
    ops.get_mut(&ticket.target)
        .filter(|op| op.generation == ticket.generation)
}

/// Returns `true` if the platform was known and transitioned.
fn apply_status(
    op: &mut EnforcementOperation,
    platform: &Platform,
    status: PlatformStatus,
    error: Option<String>,
) -> bool {
    let Some(progress) = op.platforms.get_mut(platform) else {
        return false;
    };
    if progress.status.is_terminal() {
        return false;
    }
    progress.status = status;
    if status == PlatformStatus::Failed {
        progress.error = error.or_else(|| Some("enforcement failed".into()));
    }
    true
}

/// Stamp completion the first time every platform is terminal and
/// produce the summary toast.
fn finish_if_done(op: &mut EnforcementOperation) -> Option<Toast> {
    if op.completed_at.is_some() || !op.is_complete() {
        return None;
    }
    op.completed_at = Some(Instant::now());
    info!(
        subject = %op.target,
        failed = op.failed_platforms().len(),
        "enforcement finished"
    );
    Some(op.completion_toast())
}

// ── Job driver ───────────────────────────────────────────────────────

/// Post an enforcement run and poll the job into `tracker` until the
/// ticketed operation is complete, replaced, or `deadline` elapses.
///
/// Not cancellable: once started, the poll runs to completion or timeout.
pub(crate) async fn drive_job(
    client: Arc<DnpClient>,
    tracker: Arc<EnforcementTracker>,
    ticket: EnforcementTicket,
    platforms: Vec<Platform>,
    poll_interval: Duration,
    deadline: Duration,
) {
    let (artist_id, category_id) = match &ticket.target {
        EnforcementTarget::Artist(id) => (Some(id.to_string()), None),
        EnforcementTarget::Category(id) => (None, Some(id.to_string())),
    };
    let request = EnforcementRunRequest {
        artist_id,
        category_id,
        action: ticket.action.to_string(),
        platforms: platforms.iter().map(|p| p.as_str().to_owned()).collect(),
    };
    let target = &ticket.target;

    let job = match client.run_enforcement(&request).await {
        Ok(job) => job,
        Err(e) => {
            warn!(subject = %target, error = %e, "enforcement run request failed");
            tracker.fail_remaining(&ticket, &e.to_string());
            return;
        }
    };

    tracker.set_job(&ticket, EntityId::from(job.id.as_str()));
    if tracker.apply_job(&ticket, &job) {
        return;
    }

    let give_up = Instant::now() + deadline;
    let mut interval = tokio::time::interval(poll_interval);
    // The first tick fires immediately; the run response already counted.
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            () = tokio::time::sleep_until(give_up) => {
                warn!(subject = %target, job_id = %job.id, "enforcement job timed out");
                tracker.fail_remaining(&ticket, TIMEOUT_MESSAGE);
                return;
            }
        }

        match client.get_enforcement_job(&job.id).await {
            Ok(update) => {
                if tracker.apply_job(&ticket, &update) {
                    return;
                }
            }
            // Transient poll failures are retried until the deadline.
            Err(e) => debug!(job_id = %job.id, error = %e, "enforcement poll failed"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tracker() -> EnforcementTracker {
        EnforcementTracker::new(Duration::from_secs(5))
    }

    fn artist() -> EnforcementTarget {
        EnforcementTarget::Artist(EntityId::from("a1"))
    }

    fn job(id: &str, status: &str) -> EnforcementJobItem {
        EnforcementJobItem {
            id: id.into(),
            artist_id: Some("a1".into()),
            category_id: None,
            action: "block".into(),
            status: status.into(),
            platforms: vec![dnp_api::models::PlatformProgressItem {
                platform: "spotify".into(),
                status: status.into(),
                error_message: None,
            }],
        }
    }

    #[tokio::test]
    async fn empty_platform_list_is_a_no_op() {
        let t = tracker();
        let mut toasts = t.subscribe_toasts();

        assert!(!t.start(artist(), "Alpha", EnforcementAction::Block, Vec::new()));
        assert!(t.operations().is_empty());
        assert!(toasts.try_recv().is_err());
    }

    #[tokio::test]
    async fn completes_only_after_every_platform_is_terminal() {
        let t = tracker();
        let mut toasts = t.subscribe_toasts();
        assert!(t.start(
            artist(),
            "Alpha",
            EnforcementAction::Block,
            vec![Platform::Spotify, Platform::Tidal],
        ));
        assert_eq!(toasts.try_recv().unwrap().message, "Blocking Alpha on 2 platforms");

        t.update_platform_status(&artist(), &Platform::Spotify, PlatformStatus::Completed, None);
        assert!(!t.operation(&artist()).unwrap().is_complete());
        assert!(!t.complete(&artist()));

        t.update_platform_status(&artist(), &Platform::Tidal, PlatformStatus::InProgress, None);
        assert!(!t.complete(&artist()));

        t.update_platform_status(&artist(), &Platform::Tidal, PlatformStatus::Completed, None);
        let op = t.operation(&artist()).unwrap();
        assert!(op.is_complete());
        assert!(op.completed_at.is_some());
        assert!((op.progress() - 1.0).abs() < f64::EPSILON);
        assert!(t.complete(&artist()));

        let done = toasts.try_recv().unwrap();
        assert_eq!(done.level, ToastLevel::Success);
        assert_eq!(done.message, "Blocked Alpha on 2 platforms");
        assert!(toasts.try_recv().is_err());
    }

    #[tokio::test]
    async fn failures_produce_error_toast() {
        let t = tracker();
        let mut toasts = t.subscribe_toasts();
        t.start(
            artist(),
            "Alpha",
            EnforcementAction::Unblock,
            vec![Platform::Spotify, Platform::Deezer],
        );
        let _ = toasts.try_recv();

        t.update_platform_status(
            &artist(),
            &Platform::Deezer,
            PlatformStatus::Failed,
            Some("token revoked".into()),
        );
        t.update_platform_status(&artist(), &Platform::Spotify, PlatformStatus::Completed, None);

        let toast = toasts.try_recv().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, "Unblocking Alpha failed on Deezer");

        let op = t.operation(&artist()).unwrap();
        assert_eq!(
            op.platforms[&Platform::Deezer].error.as_deref(),
            Some("token revoked")
        );
    }

    #[tokio::test]
    async fn unknown_references_and_terminal_updates_are_ignored() {
        let t = tracker();
        t.update_platform_status(&artist(), &Platform::Spotify, PlatformStatus::Completed, None);
        assert!(t.operations().is_empty());

        t.start(artist(), "Alpha", EnforcementAction::Block, vec![Platform::Spotify]);
        t.update_platform_status(&artist(), &Platform::Tidal, PlatformStatus::Failed, None);
        t.update_platform_status(&artist(), &Platform::Spotify, PlatformStatus::Failed, None);
        t.update_platform_status(&artist(), &Platform::Spotify, PlatformStatus::Completed, None);

        let op = t.operation(&artist()).unwrap();
        assert_eq!(op.platforms.len(), 1);
        assert_eq!(op.platforms[&Platform::Spotify].status, PlatformStatus::Failed);
    }

    #[tokio::test]
    async fn restarting_replaces_the_operation() {
        let t = tracker();
        t.start(artist(), "Alpha", EnforcementAction::Block, vec![Platform::Spotify]);
        t.start(
            artist(),
            "Alpha",
            EnforcementAction::Unblock,
            vec![Platform::Tidal, Platform::Deezer],
        );
        let ops = t.operations();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].action, EnforcementAction::Unblock);
        assert_eq!(ops[0].platforms.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn prune_waits_for_display_timeout() {
        let t = tracker();
        t.start(artist(), "Alpha", EnforcementAction::Block, vec![Platform::Spotify]);
        t.update_platform_status(&artist(), &Platform::Spotify, PlatformStatus::Completed, None);

        tokio::time::advance(Duration::from_secs(4)).await;
        t.prune(Instant::now());
        assert_eq!(t.operations().len(), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        t.prune(Instant::now());
        assert!(t.operations().is_empty());
    }

    #[tokio::test]
    async fn active_operations_are_never_pruned() {
        let t = tracker();
        t.start(artist(), "Alpha", EnforcementAction::Block, vec![Platform::Spotify]);
        t.prune(Instant::now() + Duration::from_secs(3600));
        assert!(t.has_active());
    }

    #[tokio::test]
    async fn jobs_for_replaced_operations_are_ignored() {
        let t = tracker();
        let ticket = t
            .begin(artist(), "Alpha", EnforcementAction::Block, vec![Platform::Spotify])
            .unwrap();
        t.set_job(&ticket, EntityId::from("j2"));

        // Same operation, different job id
        assert!(t.apply_job(&ticket, &job("j1", "completed")));
        assert!(t.has_active());
    }

    #[tokio::test]
    async fn late_answer_for_a_toggled_artist_stays_with_its_own_operation() {
        let t = tracker();
        let block = t
            .begin(artist(), "Alpha", EnforcementAction::Block, vec![Platform::Spotify])
            .unwrap();
        // Unblock arrives before the block run request has answered
        let unblock = t
            .begin(artist(), "Alpha", EnforcementAction::Unblock, vec![Platform::Spotify])
            .unwrap();
        assert!(unblock.generation > block.generation);

        t.set_job(&block, EntityId::from("j1"));
        assert!(t.apply_job(&block, &job("j1", "completed")));
        t.fail_remaining(&block, TIMEOUT_MESSAGE);

        let op = t.operation(&artist()).unwrap();
        assert_eq!(op.action, EnforcementAction::Unblock);
        assert_eq!(op.job_id, None);
        assert_eq!(op.platforms[&Platform::Spotify].status, PlatformStatus::Pending);

        t.set_job(&unblock, EntityId::from("j2"));
        assert!(!t.apply_job(&unblock, &job("j2", "running")));
        assert!(t.apply_job(&unblock, &job("j2", "completed")));
        let op = t.operation(&artist()).unwrap();
        assert_eq!(op.job_id, Some(EntityId::from("j2")));
        assert!(op.is_complete());
    }

    #[tokio::test]
    async fn category_operations_are_labelled_and_tracked_apart() {
        let t = tracker();
        let mut toasts = t.subscribe_toasts();
        let category = EnforcementTarget::Category(EntityId::from("a1"));

        t.start(category.clone(), "Hate speech", EnforcementAction::Block, vec![Platform::Tidal]);
        t.start(artist(), "Alpha", EnforcementAction::Block, vec![Platform::Tidal]);
        assert_eq!(t.operations().len(), 2);
        assert_eq!(
            toasts.try_recv().unwrap().message,
            "Blocking category Hate speech on 1 platform"
        );

        t.update_platform_status(&category, &Platform::Tidal, PlatformStatus::Completed, None);
        assert!(t.operation(&category).unwrap().is_complete());
        assert!(!t.operation(&artist()).unwrap().is_complete());
    }

    #[test]
    fn wire_statuses_map_onto_tracker_states() {
        assert_eq!(PlatformStatus::from_wire("RUNNING"), PlatformStatus::InProgress);
        assert_eq!(PlatformStatus::from_wire("succeeded"), PlatformStatus::Completed);
        assert_eq!(PlatformStatus::from_wire("error"), PlatformStatus::Failed);
        assert_eq!(PlatformStatus::from_wire("queued"), PlatformStatus::Pending);
    }
}
