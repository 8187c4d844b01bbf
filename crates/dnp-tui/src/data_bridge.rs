//! Data bridge -- connects [`Controller`] streams to TUI actions.
//!
//! Runs as a background task: connects, pushes initial snapshots, then
//! forwards every store change, enforcement update, toast and search
//! result as an [`Action`] until cancelled.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use dnp_core::{ConnectionState, Controller, EntityId};

use crate::action::{Action, ExceptedArtist, Notification};

/// Resolve excepted ids to names using the cached category member lists.
fn excepted_artists(controller: &Controller, ids: &HashSet<EntityId>) -> Vec<ExceptedArtist> {
    let members = controller.category_members().latest();
    let names: HashMap<&EntityId, &str> = members
        .iter()
        .flat_map(|list| list.iter())
        .map(|m| (&m.artist_id, m.name.as_str()))
        .collect();

    let mut out: Vec<ExceptedArtist> = ids
        .iter()
        .map(|id| ExceptedArtist {
            artist_id: id.clone(),
            name: names.get(id).map(|n| (*n).to_owned()),
        })
        .collect();
    out.sort_by_key(|e| e.label().to_lowercase());
    out
}

fn send_blocked_view(controller: &Controller, tx: &mpsc::UnboundedSender<Action>) {
    let _ = tx.send(Action::BlockedViewUpdated(Arc::new(controller.blocked_view())));
}

fn send_exceptions(controller: &Controller, tx: &mpsc::UnboundedSender<Action>) {
    let ids = controller.exceptions().snapshot();
    let named = excepted_artists(controller, &ids);
    let _ = tx.send(Action::ExceptionsUpdated(ids, Arc::new(named)));
}

/// Connect the controller and forward its reactive state to the TUI.
pub async fn spawn_data_bridge(
    controller: Controller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let _ = action_tx.send(Action::Connecting);

    if let Err(e) = controller.connect().await {
        warn!(error = %e, "failed to connect to backend");
        let _ = action_tx.send(Action::Disconnected(e.to_string()));
        let _ = action_tx.send(Action::Notify(Notification::error(e.to_string())));
        return;
    }
    let _ = action_tx.send(Action::Connected);

    for warning in controller.take_warnings().await {
        let _ = action_tx.send(Action::Notify(Notification::warning(warning)));
    }

    let mut entries = controller.dnp_entries();
    let mut categories = controller.categories();
    let mut members = controller.category_members();
    let mut connections = controller.connections();
    let mut sync_statuses = controller.sync_statuses();
    let mut sync_runs = controller.sync_runs();
    let mut exceptions = controller.exceptions().subscribe();
    let mut dashboard = controller.store().subscribe_dashboard();
    let mut enforcement = controller.enforcement().subscribe();
    let mut search = controller.search().subscribe();
    let mut toasts = controller.toasts();
    let mut conn_state = controller.connection_state();

    // Initial snapshots so every screen has data immediately
    let _ = action_tx.send(Action::DnpEntriesUpdated(entries.current().clone()));
    let _ = action_tx.send(Action::CategoriesUpdated(categories.current().clone()));
    let _ = action_tx.send(Action::ConnectionsUpdated(connections.current().clone()));
    let _ = action_tx.send(Action::SyncStatusesUpdated(
        sync_statuses.current().clone(),
    ));
    let _ = action_tx.send(Action::SyncRunsUpdated(sync_runs.current().clone()));
    let _ = action_tx.send(Action::DashboardUpdated(
        dashboard.borrow_and_update().clone(),
    ));
    send_blocked_view(&controller, &action_tx);
    send_exceptions(&controller, &action_tx);

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Some(snap) = entries.changed() => {
                let _ = action_tx.send(Action::DnpEntriesUpdated(snap));
                send_blocked_view(&controller, &action_tx);
            }
            Some(snap) = categories.changed() => {
                let _ = action_tx.send(Action::CategoriesUpdated(snap));
                send_blocked_view(&controller, &action_tx);
            }
            Some(_) = members.changed() => {
                send_blocked_view(&controller, &action_tx);
                send_exceptions(&controller, &action_tx);
            }
            Ok(()) = exceptions.changed() => {
                send_exceptions(&controller, &action_tx);
                send_blocked_view(&controller, &action_tx);
            }
            Some(snap) = connections.changed() => {
                let _ = action_tx.send(Action::ConnectionsUpdated(snap));
            }
            Some(snap) = sync_statuses.changed() => {
                let _ = action_tx.send(Action::SyncStatusesUpdated(snap));
            }
            Some(snap) = sync_runs.changed() => {
                let _ = action_tx.send(Action::SyncRunsUpdated(snap));
            }
            Ok(()) = dashboard.changed() => {
                let stats = dashboard.borrow_and_update().clone();
                let _ = action_tx.send(Action::DashboardUpdated(stats));
            }
            Ok(()) = enforcement.changed() => {
                let ops = enforcement.borrow_and_update().clone();
                let _ = action_tx.send(Action::EnforcementUpdated(ops));
            }
            Ok(()) = search.changed() => {
                let state = search.borrow_and_update().clone();
                let _ = action_tx.send(Action::SearchUpdated(state));
            }
            Ok(toast) = toasts.recv() => {
                let _ = action_tx.send(Action::Notify(Notification::from(toast)));
            }
            Ok(()) = conn_state.changed() => {
                let state = conn_state.borrow_and_update().clone();
                let action = match state {
                    ConnectionState::Connected => Action::Connected,
                    ConnectionState::Connecting => Action::Connecting,
                    ConnectionState::Disconnected => Action::Disconnected("disconnected".into()),
                    ConnectionState::Failed => Action::Disconnected("connection failed".into()),
                };
                let _ = action_tx.send(action);
            }
        }
    }

    controller.disconnect().await;
    debug!("data bridge shut down");
}
