//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use dnp_core::{Controller, EnforcementOperation, EnforcementTarget, PlatformStatus};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Parse a `YYYY-MM-DD` flag value.
pub fn parse_date(field: &str, raw: &str) -> Result<chrono::NaiveDate, CliError> {
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("expected YYYY-MM-DD, got '{raw}'"),
    })
}

// ── Enforcement progress ─────────────────────────────────────────────

/// Block until the enforcement operation for `target` is far enough
/// along for the process to exit.
///
/// Without `wait` this returns once the backend accepted the job, so the
/// run request is never lost when the CLI exits. With `wait` it follows the
/// job until every platform is terminal and prints per-platform results.
pub async fn follow_enforcement(
    controller: &Controller,
    target: &EnforcementTarget,
    wait: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let tracker = controller.enforcement();
    let mut rx = tracker.subscribe();

    let spinner = (!quiet && std::io::stderr().is_terminal()).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let mut last: Option<EnforcementOperation> = None;
    loop {
        let current = tracker.operation(target);
        let done = match current {
            // Pruned (or never started: no active connections)
            None => true,
            Some(ref op) if op.is_complete() => true,
            Some(ref op) => !wait && op.job_id.is_some(),
        };
        if let (Some(pb), Some(op)) = (&spinner, &current) {
            pb.set_message(progress_message(op));
        }
        if current.is_some() {
            last = current;
        }
        if done {
            break;
        }
        if rx.changed().await.is_err() {
            break;
        }
    }

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if !wait || quiet {
        return Ok(());
    }
    if let Some(op) = last {
        for (platform, progress) in &op.platforms {
            match progress.status {
                PlatformStatus::Completed => eprintln!("  {}: done", platform.display_name()),
                PlatformStatus::Failed => eprintln!(
                    "  {}: failed ({})",
                    platform.display_name(),
                    progress.error.as_deref().unwrap_or("unknown error")
                ),
                _ => eprintln!("  {}: still running", platform.display_name()),
            }
        }
    }
    Ok(())
}

fn progress_message(op: &EnforcementOperation) -> String {
    let done = op
        .platforms
        .values()
        .filter(|p| p.status.is_terminal())
        .count();
    format!(
        "{} {} on {done}/{} platforms",
        op.action,
        op.label(),
        op.platforms.len()
    )
}
