//! Sync command handlers.

use std::sync::Arc;

use tabled::Tabled;

use dnp_core::{
    Command as CoreCommand, CommandResult, Controller, EntityId, Platform, PlatformSyncStatus,
    SyncRun,
};

use crate::cli::{GlobalOpts, SyncArgs, SyncCommand};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last sync")]
    last_sync: String,
    #[tabled(rename = "Blocked")]
    blocked: u64,
}

fn status_row(s: &Arc<PlatformSyncStatus>, color: bool) -> StatusRow {
    StatusRow {
        platform: s.platform.display_name().to_owned(),
        status: output::sync_status_cell(s.status, color),
        last_sync: s
            .last_sync_at
            .map_or_else(|| "never".into(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
        blocked: s.artists_blocked,
    }
}

#[derive(Tabled)]
struct RunRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Type")]
    sync_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Processed")]
    processed: u64,
    #[tabled(rename = "Blocked")]
    blocked: u64,
    #[tabled(rename = "Errors")]
    errors: u64,
    #[tabled(rename = "Started")]
    started: String,
}

fn run_row(r: &SyncRun, color: bool) -> RunRow {
    RunRow {
        id: r.id.to_string(),
        platform: r.platform.display_name().to_owned(),
        sync_type: r.sync_type.to_string(),
        status: output::sync_status_cell(r.status, color),
        processed: r.artists_processed,
        blocked: r.artists_blocked,
        errors: r.error_count,
        started: r
            .started_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: SyncArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    match args.command {
        SyncCommand::Status => {
            let snap = controller.sync_statuses_snapshot();
            let out = output::render_list(
                &global.output,
                &snap,
                |s| status_row(s, color),
                |s| s.platform.as_str().to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SyncCommand::Runs { limit } => {
            let runs = controller.list_sync_runs(limit).await?;
            let out = output::render_list(
                &global.output,
                &runs,
                |r| run_row(r, color),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SyncCommand::Trigger { platforms, full } => {
            let platforms: Vec<Platform> = platforms.into_iter().map(Platform::from).collect();
            let result = controller
                .execute(CoreCommand::TriggerSync { platforms, full })
                .await?;
            if let CommandResult::SyncRuns(runs) = result {
                if !global.quiet {
                    eprintln!("Started {} sync run(s)", runs.len());
                }
                let out = output::render_list(
                    &global.output,
                    &runs,
                    |r| run_row(r, color),
                    |r| r.id.to_string(),
                );
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        SyncCommand::Cancel { run } => {
            let run_id = EntityId::from(run);
            let cancellable = controller
                .sync_runs_snapshot()
                .iter()
                .find(|r| r.id == run_id)
                .map(|r| r.status.is_active());
            if cancellable == Some(false) {
                return Err(CliError::Validation {
                    field: "run".into(),
                    reason: format!("sync run {run_id} has already finished"),
                });
            }
            controller
                .execute(CoreCommand::CancelSync {
                    run_id: run_id.clone(),
                })
                .await?;
            if !global.quiet {
                eprintln!("Cancelled sync run {run_id}");
            }
            Ok(())
        }
    }
}
