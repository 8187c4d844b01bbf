// ── Controller abstraction ──
//
// Full lifecycle management for a backend session. Handles
// authentication, background refresh, command routing, enforcement
// tracking, debounced search and the category exception layer.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::future::join_all;
use secrecy::SecretString;
use tokio::sync::{Mutex, broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use dnp_api::DnpClient;
use dnp_api::models::{AddDnpRequest, TriggerSyncRequest, UpdateDnpRequest};
use dnp_api::transport::{TlsMode, TransportConfig};

use crate::command::{
    Command, CommandEnvelope, CommandResult, CreateOffenseReportRequest, EvidenceInput,
    OffenseFilter,
};
use crate::config::{AuthCredentials, ControllerConfig, TlsVerification};
use crate::convert::trend_point;
use crate::enforcement::{self, EnforcementAction, EnforcementTarget, EnforcementTracker, Toast};
use crate::error::CoreError;
use crate::exceptions::ExceptionStore;
use crate::model::{
    Artist, ArtistSearchResult, BlockedArtist, Category, CategoryMember, DashboardStats, DnpEntry,
    EntityId, Evidence, Offense, PlatformConnection, PlatformSyncStatus, Report,
    SyncRun, SyncType, TrendPoint, User, blocked_view,
};
use crate::search::SearchDebouncer;
use crate::store::{DataStore, RefreshSnapshot};
use crate::stream::EntityStream;

const COMMAND_CHANNEL_SIZE: usize = 64;
const SYNC_RUN_LIMIT: u32 = 20;
const PRUNE_INTERVAL: Duration = Duration::from_secs(1);

type ClientSlot = Arc<Mutex<Option<Arc<DnpClient>>>>;

// ── ConnectionState ──────────────────────────────────────────────

/// Connection state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Views read reactive
/// snapshots from the [`DataStore`] and mutate state only through
/// [`execute`](Self::execute).
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    store: Arc<DataStore>,
    exceptions: Arc<ExceptionStore>,
    enforcement: Arc<EnforcementTracker>,
    search: SearchDebouncer,
    connection_state: watch::Sender<ConnectionState>,
    command_tx: Mutex<mpsc::Sender<CommandEnvelope>>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    /// Child token for the current connection -- cancelled on disconnect,
    /// replaced on reconnect.
    cancel_child: Mutex<CancellationToken>,
    client: ClientSlot,
    user: Mutex<Option<User>>,
    /// Token captured from an email/password login.
    session_token: Mutex<Option<SecretString>>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
    /// Warnings accumulated during connect (e.g. dashboard unavailable).
    warnings: Mutex<Vec<String>>,
}

impl Controller {
    /// Create a new Controller from configuration. Does NOT connect --
    /// call [`connect()`](Self::connect) to authenticate and start background tasks.
    ///
    /// The exception store is opened here, so excepted artists are known
    /// before the first refresh.
    pub fn new(config: ControllerConfig) -> Self {
        let store = Arc::new(DataStore::new());
        let exceptions = Arc::new(match &config.exceptions_path {
            Some(path) => ExceptionStore::open(path.clone()),
            None => ExceptionStore::in_memory(),
        });
        let enforcement = Arc::new(EnforcementTracker::new(config.operation_display_timeout));
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();
        let client: ClientSlot = Arc::new(Mutex::new(None));
        let search = search_debouncer(
            Arc::clone(&client),
            config.effective_search_debounce(),
            config.search_limit,
        );

        Self {
            inner: Arc::new(ControllerInner {
                config,
                store,
                exceptions,
                enforcement,
                search,
                connection_state,
                command_tx: Mutex::new(command_tx),
                command_rx: Mutex::new(Some(command_rx)),
                cancel,
                cancel_child: Mutex::new(cancel_child),
                client,
                user: Mutex::new(None),
                session_token: Mutex::new(None),
                task_handles: Mutex::new(Vec::new()),
                warnings: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Access the controller configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    /// Access the underlying DataStore.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Connect to the backend.
    ///
    /// Authenticates, performs an initial data refresh, and spawns
    /// background tasks (periodic refresh, command processor, pruning of
    /// finished enforcement operations).
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.inner
            .connection_state
            .send_replace(ConnectionState::Connecting);

        // Fresh child token for this connection (supports reconnect).
        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        if let Err(e) = self.authenticate().await {
            self.inner.connection_state.send_replace(ConnectionState::Failed);
            return Err(e);
        }

        // Initial data load
        if let Err(e) = self.full_refresh().await {
            self.inner.connection_state.send_replace(ConnectionState::Failed);
            return Err(e);
        }

        // Spawn background tasks
        let mut handles = self.inner.task_handles.lock().await;

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let ctrl = self.clone();
            handles.push(tokio::spawn(command_processor_task(ctrl, rx)));
        }

        let interval_secs = self.inner.config.refresh_interval_secs;
        if interval_secs > 0 {
            let ctrl = self.clone();
            let cancel = child.clone();
            handles.push(tokio::spawn(refresh_task(ctrl, interval_secs, cancel)));
        }

        handles.push(tokio::spawn(prune_task(
            Arc::clone(&self.inner.enforcement),
            child,
        )));

        self.inner.connection_state.send_replace(ConnectionState::Connected);
        info!(url = %self.inner.config.url, "connected to backend");
        Ok(())
    }

    /// Build the HTTP client and install credentials.
    async fn authenticate(&self) -> Result<(), CoreError> {
        let config = &self.inner.config;
        let transport = build_transport(config);
        let client = DnpClient::new(config.url.as_str(), &transport)?;

        match &config.auth {
            AuthCredentials::Token(token) => {
                client.set_token(token.clone());
                debug!("using configured API token");
                // The profile endpoint is optional; only a 401 is fatal here.
                match client.current_user().await {
                    Ok(user) => *self.inner.user.lock().await = Some(User::from(user)),
                    Err(ref e) if e.is_auth_expired() => {
                        return Err(CoreError::AuthenticationFailed {
                            message: "API token rejected -- log in again".into(),
                        });
                    }
                    Err(e) => debug!(error = %e, "could not fetch user profile"),
                }
            }
            AuthCredentials::Credentials { email, password } => {
                let session = client.login(email, password).await?;
                debug!("password login successful");
                *self.inner.session_token.lock().await = Some(session.token);
                *self.inner.user.lock().await = session.user.map(User::from);
            }
        }

        *self.inner.client.lock().await = Some(Arc::new(client));
        Ok(())
    }

    /// Disconnect from the backend.
    ///
    /// Cancels background tasks, logs out if session-based, empties the
    /// store and resets the connection state to [`Disconnected`](ConnectionState::Disconnected).
    /// Enforcement polls already running are left to finish.
    pub async fn disconnect(&self) {
        // Cancel the child token (not the parent -- allows reconnect).
        self.inner.cancel_child.lock().await.cancel();
        self.inner.search.clear();

        // Join all background tasks
        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        drop(handles);

        if matches!(self.inner.config.auth, AuthCredentials::Credentials { .. }) {
            if let Some(client) = self.inner.client.lock().await.as_ref() {
                if let Err(e) = client.logout().await {
                    warn!(error = %e, "logout failed (non-fatal)");
                }
            }
        }

        *self.inner.client.lock().await = None;
        *self.inner.session_token.lock().await = None;
        self.inner.store.clear();

        // Recreate command channel so reconnects can spawn a fresh receiver.
        {
            let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
            *self.inner.command_tx.lock().await = tx;
            *self.inner.command_rx.lock().await = Some(rx);
        }

        self.inner
            .connection_state
            .send_replace(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    /// Fetch all server-backed state and update the DataStore.
    ///
    /// The DNP list, categories and connections must load; sync state and
    /// the dashboard are best-effort and keep their previous values on
    /// failure. Members are fetched for subscribed categories only.
    pub async fn full_refresh(&self) -> Result<(), CoreError> {
        let client = self.client().await?;

        let (dnp_res, categories_res, connections_res, status_res, runs_res, dashboard_res) =
            tokio::join!(
                client.list_dnp(),
                client.list_categories(),
                client.list_connections(),
                client.sync_status(),
                client.list_sync_runs(SYNC_RUN_LIMIT),
                client.dashboard(),
            );

        let dnp_entries: Vec<DnpEntry> = dnp_res?.into_iter().map(DnpEntry::from).collect();
        let categories: Vec<Category> = categories_res?.into_iter().map(Category::from).collect();
        let connections: Vec<PlatformConnection> = connections_res?
            .into_iter()
            .map(PlatformConnection::from)
            .collect();

        let mut notes = Vec::new();
        let sync_statuses = optional("sync/status", status_res, &mut notes)
            .map(|v| v.into_iter().map(PlatformSyncStatus::from).collect());
        let sync_runs = optional("sync/runs", runs_res, &mut notes)
            .map(|v| v.into_iter().map(SyncRun::from).collect());
        let dashboard = optional("analytics/dashboard", dashboard_res, &mut notes)
            .map(DashboardStats::from);

        let category_members = self
            .fetch_members(&client, categories.iter().filter(|c| c.subscribed))
            .await;

        self.inner.store.apply_snapshot(RefreshSnapshot {
            dnp_entries,
            categories,
            connections,
            category_members,
            sync_statuses,
            sync_runs,
            dashboard,
        });

        if *self.inner.connection_state.borrow() == ConnectionState::Connecting {
            self.inner.warnings.lock().await.extend(notes);
        }

        debug!(
            dnp_entries = self.inner.store.dnp_entry_count(),
            categories = self.inner.store.category_count(),
            subscribed = self.inner.store.subscribed_category_count(),
            "data refresh complete"
        );
        Ok(())
    }

    /// Fetch member lists concurrently. A failed fetch keeps whatever the
    /// store already had for that category.
    async fn fetch_members<'a>(
        &self,
        client: &DnpClient,
        categories: impl Iterator<Item = &'a Category>,
    ) -> HashMap<EntityId, Vec<CategoryMember>> {
        let ids: Vec<EntityId> = categories.map(|c| c.id.clone()).collect();
        let keys: Vec<String> = ids.iter().map(ToString::to_string).collect();
        let results = join_all(keys.iter().map(|k| client.list_category_artists(k))).await;

        let mut members = HashMap::with_capacity(ids.len());
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(items) => {
                    members.insert(id, items.into_iter().map(CategoryMember::from).collect());
                }
                Err(e) => {
                    warn!(category = %id, error = %e, "failed to fetch category members");
                    if let Some(previous) = self.inner.store.category_members(&id) {
                        members.insert(id, previous.as_ref().clone());
                    }
                }
            }
        }
        members
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command against the backend.
    ///
    /// Sends the command through the internal channel to the command
    /// processor task and awaits the result.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.connection_state.borrow() != ConnectionState::Connected {
            return Err(CoreError::ControllerDisconnected);
        }

        let (tx, rx) = tokio::sync::oneshot::channel();

        let command_tx = self.inner.command_tx.lock().await.clone();

        command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::ControllerDisconnected)?;

        rx.await.map_err(|_| CoreError::ControllerDisconnected)?
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// One-shot: connect, run closure, disconnect.
    ///
    /// Optimized for CLI: disables periodic refresh since we only need a
    /// single request-response cycle.
    pub async fn oneshot<F, Fut, T>(config: ControllerConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Controller) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.refresh_interval_secs = 0;

        let controller = Controller::new(cfg);
        controller.connect().await?;
        let result = f(controller.clone()).await;
        controller.disconnect().await;
        result
    }

    // ── Ad-hoc reads (bypass the command channel) ────────────────

    /// Search the artist catalog immediately, without debouncing.
    pub async fn search_artists(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<ArtistSearchResult>, CoreError> {
        let client = self.client().await?;
        let items = client.search_artists(query.trim(), limit).await?;
        Ok(items.into_iter().map(ArtistSearchResult::from).collect())
    }

    pub async fn get_artist(&self, artist_id: &EntityId) -> Result<Artist, CoreError> {
        let client = self.client().await?;
        client
            .get_artist(&artist_id.to_string())
            .await
            .map(Artist::from)
            .map_err(|e| not_found_as("Artist", artist_id, e))
    }

    pub async fn list_offenses(&self, filter: &OffenseFilter) -> Result<Vec<Offense>, CoreError> {
        let client = self.client().await?;
        let items = client.list_offenses(&filter.to_wire()).await?;
        Ok(items.into_iter().map(Offense::from).collect())
    }

    pub async fn get_offense(&self, offense_id: &EntityId) -> Result<Offense, CoreError> {
        let client = self.client().await?;
        client
            .get_offense(&offense_id.to_string())
            .await
            .map(Offense::from)
            .map_err(|e| not_found_as("Offense", offense_id, e))
    }

    /// Members of any category, subscribed or not. Not cached.
    pub async fn list_category_members(
        &self,
        category_id: &EntityId,
    ) -> Result<Vec<CategoryMember>, CoreError> {
        let client = self.client().await?;
        let items = client
            .list_category_artists(&category_id.to_string())
            .await
            .map_err(|e| not_found_as("Category", category_id, e))?;
        Ok(items.into_iter().map(CategoryMember::from).collect())
    }

    /// Fetch recent sync runs and refresh the store with them.
    pub async fn list_sync_runs(&self, limit: u32) -> Result<Vec<SyncRun>, CoreError> {
        let client = self.client().await?;
        let runs: Vec<SyncRun> = client
            .list_sync_runs(limit)
            .await?
            .into_iter()
            .map(SyncRun::from)
            .collect();
        self.inner.store.replace_sync_runs(runs.clone());
        Ok(runs)
    }

    /// Daily blocked/unblocked counts for the last `days` days.
    pub async fn get_trends(&self, days: u32) -> Result<Vec<TrendPoint>, CoreError> {
        let client = self.client().await?;
        let items = client.trends(days).await?;
        Ok(items.into_iter().filter_map(trend_point).collect())
    }

    pub async fn get_report(&self, report_id: &EntityId) -> Result<Report, CoreError> {
        let client = self.client().await?;
        client
            .get_report(&report_id.to_string())
            .await
            .map(Report::from)
            .map_err(|e| not_found_as("Report", report_id, e))
    }

    // ── Client-local layers ──────────────────────────────────────

    /// The debounced artist search shared by all views.
    pub fn search(&self) -> &SearchDebouncer {
        &self.inner.search
    }

    pub fn exceptions(&self) -> &Arc<ExceptionStore> {
        &self.inner.exceptions
    }

    pub fn enforcement(&self) -> &Arc<EnforcementTracker> {
        &self.inner.enforcement
    }

    /// Subscribe to enforcement toasts.
    pub fn toasts(&self) -> broadcast::Receiver<Toast> {
        self.inner.enforcement.subscribe_toasts()
    }

    /// Direct entries plus members of subscribed categories, minus
    /// exceptions, each labelled with where the block comes from.
    pub fn blocked_view(&self) -> Vec<BlockedArtist> {
        let store = &self.inner.store;
        let entries = store.dnp_entries_snapshot();
        let categories = store.categories_snapshot();
        let exceptions = self.inner.exceptions.snapshot();
        blocked_view(
            entries.iter().map(AsRef::as_ref),
            categories.iter().map(AsRef::as_ref),
            |id| store.category_members(id),
            &exceptions,
        )
    }

    // ── State observation ────────────────────────────────────────

    /// Subscribe to connection state changes.
    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    /// The signed-in user, when the backend reported one.
    pub async fn user(&self) -> Option<User> {
        self.inner.user.lock().await.clone()
    }

    /// Token obtained by an email/password login, for saving to the keyring.
    pub async fn session_token(&self) -> Option<SecretString> {
        self.inner.session_token.lock().await.clone()
    }

    /// Drain warnings accumulated during connect.
    pub async fn take_warnings(&self) -> Vec<String> {
        std::mem::take(&mut *self.inner.warnings.lock().await)
    }

    // ── Snapshot accessors (delegate to DataStore) ───────────────

    pub fn dnp_entries_snapshot(&self) -> Arc<Vec<Arc<DnpEntry>>> {
        self.inner.store.dnp_entries_snapshot()
    }

    pub fn categories_snapshot(&self) -> Arc<Vec<Arc<Category>>> {
        self.inner.store.categories_snapshot()
    }

    pub fn connections_snapshot(&self) -> Arc<Vec<Arc<PlatformConnection>>> {
        self.inner.store.connections_snapshot()
    }

    pub fn sync_statuses_snapshot(&self) -> Arc<Vec<Arc<PlatformSyncStatus>>> {
        self.inner.store.sync_statuses_snapshot()
    }

    pub fn sync_runs_snapshot(&self) -> Vec<Arc<SyncRun>> {
        self.inner.store.sync_runs_snapshot()
    }

    pub fn dashboard(&self) -> Option<Arc<DashboardStats>> {
        self.inner.store.dashboard()
    }

    // ── Stream accessors (delegate to DataStore) ─────────────────

    pub fn dnp_entries(&self) -> EntityStream<DnpEntry> {
        self.inner.store.subscribe_dnp_entries()
    }

    pub fn categories(&self) -> EntityStream<Category> {
        self.inner.store.subscribe_categories()
    }

    pub fn category_members(&self) -> EntityStream<Vec<CategoryMember>> {
        self.inner.store.subscribe_category_members()
    }

    pub fn connections(&self) -> EntityStream<PlatformConnection> {
        self.inner.store.subscribe_connections()
    }

    pub fn sync_statuses(&self) -> EntityStream<PlatformSyncStatus> {
        self.inner.store.subscribe_sync_statuses()
    }

    pub fn sync_runs(&self) -> EntityStream<SyncRun> {
        self.inner.store.subscribe_sync_runs()
    }

    // ── Internals ────────────────────────────────────────────────

    async fn client(&self) -> Result<Arc<DnpClient>, CoreError> {
        self.inner
            .client
            .lock()
            .await
            .clone()
            .ok_or(CoreError::ControllerDisconnected)
    }

    /// Start enforcement on every active connection and poll the backend
    /// job in the background. No-op without active connections.
    fn start_enforcement(
        &self,
        client: Arc<DnpClient>,
        target: EnforcementTarget,
        name: String,
        action: EnforcementAction,
    ) {
        let platforms = self.inner.store.active_platforms();
        let tracker = Arc::clone(&self.inner.enforcement);
        let Some(ticket) = tracker.begin(target, name, action, platforms.clone()) else {
            return;
        };

        let config = &self.inner.config;
        tokio::spawn(enforcement::drive_job(
            client,
            tracker,
            ticket,
            platforms,
            config.enforcement_poll_interval,
            config.enforcement_timeout,
        ));
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically refresh data from the backend.
async fn refresh_task(controller: Controller, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = controller.full_refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}

/// Drop finished enforcement operations once they have been shown.
async fn prune_task(tracker: Arc<EnforcementTracker>, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(PRUNE_INTERVAL);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => tracker.prune(tokio::time::Instant::now()),
        }
    }
}

/// Process commands from the mpsc channel one at a time.
async fn command_processor_task(controller: Controller, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = controller.inner.cancel_child.lock().await.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&controller, envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────

/// Route a command to its backend call, applying optimistic store
/// updates and reverting them when the call fails.
#[allow(clippy::too_many_lines)]
async fn route_command(controller: &Controller, cmd: Command) -> Result<CommandResult, CoreError> {
    let client = controller.client().await?;
    let store = &controller.inner.store;
    let exceptions = &controller.inner.exceptions;

    match cmd {
        // ── DNP list ─────────────────────────────────────────────
        Command::BlockArtist {
            artist_id,
            artist_name,
            tags,
            note,
        } => {
            let previous = store.dnp_entry(&artist_id);
            store.upsert_dnp_entry(DnpEntry {
                artist_id: artist_id.clone(),
                artist_name: artist_name.clone(),
                tags: tags.clone(),
                note: note.clone(),
                created_at: previous.as_ref().map_or_else(Utc::now, |p| p.created_at),
                image_url: previous.as_ref().and_then(|p| p.image_url.clone()),
                genres: previous.as_ref().map(|p| p.genres.clone()).unwrap_or_default(),
            });

            let request = AddDnpRequest {
                artist_id: artist_id.to_string(),
                tags,
                note,
            };
            let entry = match client.add_dnp(&request).await {
                Ok(item) => DnpEntry::from(item),
                Err(e) => {
                    debug!(%artist_id, "reverting optimistic block");
                    match previous {
                        Some(p) => store.upsert_dnp_entry(p.as_ref().clone()),
                        None => {
                            store.remove_dnp_entry(&artist_id);
                        }
                    }
                    return Err(e.into());
                }
            };
            store.upsert_dnp_entry(entry.clone());

            // An explicit block overrides a category exception.
            if let Err(e) = exceptions.reblock(&artist_id) {
                warn!(%artist_id, error = %e, "failed to clear exception");
            }

            let name = if entry.artist_name.is_empty() {
                artist_name
            } else {
                entry.artist_name.clone()
            };
            let target = EnforcementTarget::Artist(artist_id);
            controller.start_enforcement(client, target, name, EnforcementAction::Block);
            Ok(CommandResult::DnpEntry(entry))
        }

        Command::UnblockArtist { artist_id } => {
            let removed = store.remove_dnp_entry(&artist_id);

            if let Err(e) = client.remove_dnp(&artist_id.to_string()).await {
                if let Some(entry) = removed {
                    debug!(%artist_id, "reverting optimistic unblock");
                    store.upsert_dnp_entry(entry.as_ref().clone());
                }
                return Err(not_found_as("DNP entry", &artist_id, e));
            }

            let name = removed.map_or_else(|| artist_id.to_string(), |e| e.artist_name.clone());
            let target = EnforcementTarget::Artist(artist_id);
            controller.start_enforcement(client, target, name, EnforcementAction::Unblock);
            Ok(CommandResult::Ok)
        }

        Command::UpdateEntry {
            artist_id,
            tags,
            note,
        } => {
            let request = UpdateDnpRequest { tags, note };
            let entry = client
                .update_dnp(&artist_id.to_string(), &request)
                .await
                .map(DnpEntry::from)
                .map_err(|e| not_found_as("DNP entry", &artist_id, e))?;
            store.upsert_dnp_entry(entry.clone());
            Ok(CommandResult::DnpEntry(entry))
        }

        // ── Categories ───────────────────────────────────────────
        Command::SubscribeCategory { id } => {
            client
                .subscribe_category(&id.to_string())
                .await
                .map_err(|e| not_found_as("Category", &id, e))?;
            store.set_category_subscribed(&id, true);

            match client.list_category_artists(&id.to_string()).await {
                Ok(items) => store.set_category_members(
                    id.clone(),
                    items.into_iter().map(CategoryMember::from).collect(),
                ),
                Err(e) => warn!(category = %id, error = %e, "failed to fetch category members"),
            }
            let name = category_name(store, &id);
            let target = EnforcementTarget::Category(id.clone());
            controller.start_enforcement(client, target, name, EnforcementAction::Block);
            Ok(category_result(store, &id))
        }

        Command::UnsubscribeCategory { id } => {
            client
                .unsubscribe_category(&id.to_string())
                .await
                .map_err(|e| not_found_as("Category", &id, e))?;
            store.set_category_subscribed(&id, false);
            store.remove_category_members(&id);
            let name = category_name(store, &id);
            let target = EnforcementTarget::Category(id.clone());
            controller.start_enforcement(client, target, name, EnforcementAction::Unblock);
            Ok(category_result(store, &id))
        }

        Command::ExceptArtist { artist_id } => {
            exceptions.except(artist_id)?;
            Ok(CommandResult::Ok)
        }

        Command::ReblockArtist { artist_id } => {
            exceptions.reblock(&artist_id)?;
            Ok(CommandResult::Ok)
        }

        // ── Offenses ─────────────────────────────────────────────
        Command::SubmitOffenseReport(report) => submit_report(&client, &report).await,

        Command::AddEvidence {
            offense_id,
            evidence,
        } => add_evidence(&client, &offense_id, &evidence).await,

        // ── Platforms and sync ───────────────────────────────────
        Command::TriggerSync { platforms, full } => {
            let sync_type = if full {
                SyncType::Full
            } else {
                SyncType::Incremental
            };
            let request = TriggerSyncRequest {
                platforms: platforms.iter().map(|p| p.as_str().to_owned()).collect(),
                sync_type: sync_type.to_string(),
            };
            let runs: Vec<SyncRun> = client
                .trigger_sync(&request)
                .await?
                .into_iter()
                .map(SyncRun::from)
                .collect();
            for run in &runs {
                store.upsert_sync_run(run.clone());
            }
            refresh_sync_statuses(&client, store).await;
            info!(runs = runs.len(), full, "sync triggered");
            Ok(CommandResult::SyncRuns(runs))
        }

        Command::CancelSync { run_id } => {
            client
                .cancel_sync(&run_id.to_string())
                .await
                .map_err(|e| not_found_as("Sync run", &run_id, e))?;
            match client.list_sync_runs(SYNC_RUN_LIMIT).await {
                Ok(runs) => store.replace_sync_runs(runs.into_iter().map(SyncRun::from).collect()),
                Err(e) => warn!(error = %e, "failed to refresh sync runs"),
            }
            refresh_sync_statuses(&client, store).await;
            Ok(CommandResult::Ok)
        }

        Command::DisconnectPlatform { platform } => {
            client
                .disconnect_platform(platform.as_str())
                .await
                .map_err(|e| not_found_as("Connection", &platform, e))?;
            info!(%platform, "platform disconnected");
            refresh_connections(&client, store).await;
            Ok(CommandResult::Ok)
        }

        // ── Analytics ────────────────────────────────────────────
        Command::GenerateReport(request) => {
            let report = client.generate_report(&request.to_wire()).await?;
            Ok(CommandResult::Report(Report::from(report)))
        }
    }
}

async fn submit_report(
    client: &DnpClient,
    report: &CreateOffenseReportRequest,
) -> Result<CommandResult, CoreError> {
    report.validate()?;
    let offense = client.create_offense(&report.to_wire()).await?;
    info!(offense_id = %offense.id, "offense report submitted");
    Ok(CommandResult::Offense(Offense::from(offense)))
}

async fn add_evidence(
    client: &DnpClient,
    offense_id: &EntityId,
    evidence: &EvidenceInput,
) -> Result<CommandResult, CoreError> {
    evidence.validate()?;
    let item = client
        .add_evidence(&offense_id.to_string(), &evidence.to_wire())
        .await
        .map_err(|e| not_found_as("Offense", offense_id, e))?;
    Ok(CommandResult::Evidence(Evidence::from(item)))
}

async fn refresh_connections(client: &DnpClient, store: &DataStore) {
    match client.list_connections().await {
        Ok(items) => {
            store.replace_connections(items.into_iter().map(PlatformConnection::from).collect());
        }
        Err(e) => warn!(error = %e, "failed to refresh connections"),
    }
}

async fn refresh_sync_statuses(client: &DnpClient, store: &DataStore) {
    match client.sync_status().await {
        Ok(items) => {
            store.replace_sync_statuses(items.into_iter().map(PlatformSyncStatus::from).collect());
        }
        Err(e) => debug!(error = %e, "sync status unavailable"),
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn search_debouncer(client: ClientSlot, delay: Duration, limit: u32) -> SearchDebouncer {
    SearchDebouncer::new(delay, move |query: String| {
        let client = Arc::clone(&client);
        async move {
            let client = client
                .lock()
                .await
                .clone()
                .ok_or(CoreError::ControllerDisconnected)?;
            let items = client.search_artists(&query, limit).await?;
            Ok::<_, CoreError>(items.into_iter().map(ArtistSearchResult::from).collect())
        }
    })
}

/// Build a [`TransportConfig`] from the controller configuration.
fn build_transport(config: &ControllerConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

fn category_result(store: &DataStore, id: &EntityId) -> CommandResult {
    store
        .category(id)
        .map_or(CommandResult::Ok, |c| CommandResult::Category(c.as_ref().clone()))
}

fn category_name(store: &DataStore, id: &EntityId) -> String {
    store
        .category(id)
        .map_or_else(|| id.to_string(), |c| c.name.clone())
}

/// Best-effort fetch: log and fall back to `None` so the store keeps its
/// previous value. 404s are expected on backends without the endpoint.
fn optional<T>(
    endpoint: &str,
    result: Result<T, dnp_api::Error>,
    notes: &mut Vec<String>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(ref e) if e.is_not_found() => {
            debug!("{endpoint}: not available (404)");
            None
        }
        Err(e) => {
            warn!("{endpoint}: {e}");
            notes.push(format!("{endpoint} unavailable: {e}"));
            None
        }
    }
}

/// Attach the entity type and identifier to a 404.
fn not_found_as(entity_type: &str, identifier: &impl ToString, err: dnp_api::Error) -> CoreError {
    if err.is_not_found() {
        CoreError::not_found(entity_type, identifier.to_string())
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_modes_map_one_to_one() {
        assert!(matches!(
            tls_to_transport(&TlsVerification::SystemDefaults),
            TlsMode::System
        ));
        assert!(matches!(
            tls_to_transport(&TlsVerification::DangerAcceptInvalid),
            TlsMode::DangerAcceptInvalid
        ));
    }

    #[test]
    fn not_found_carries_entity_type() {
        let err = not_found_as(
            "Artist",
            &EntityId::from("a9"),
            dnp_api::Error::Api {
                status: Some(404),
                message: "missing".into(),
            },
        );
        assert!(
            matches!(
                err,
                CoreError::NotFound { ref entity_type, ref identifier }
                    if entity_type == "Artist" && identifier == "a9"
            )
        );
    }
}
