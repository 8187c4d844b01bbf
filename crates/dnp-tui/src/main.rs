//! `dnp-tui` -- interactive terminal client for a do-not-play artist list.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `dnp-core`. Screens are navigable via number keys (1-6): Blocklist,
//! Search, Categories, Offenses, Platforms and Analytics.
//!
//! Logs go to a file (default `<data dir>/dnp-tui.log`) so they never
//! corrupt the terminal. A background data bridge forwards store changes,
//! enforcement progress and toasts from the controller into the app loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use dnp_config::Profile;
use dnp_core::{Controller, ControllerConfig};

use crate::app::App;

/// Terminal client for managing your do-not-play list.
#[derive(Parser, Debug)]
#[command(name = "dnp-tui", version, about)]
struct Cli {
    /// Profile from the shared config file
    #[arg(short = 'p', long, env = "DNP_PROFILE")]
    profile: Option<String>,

    /// Backend URL, overriding the profile
    #[arg(short = 'u', long, env = "DNP_URL")]
    url: Option<String>,

    /// API token, overriding the profile
    #[arg(long, env = "DNP_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may be logged to stdout/stderr while the
/// terminal is in raw mode. The guard must live until exit so logs flush.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("dnp_tui={log_level},dnp_core={log_level}"))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| dnp_config::data_dir().join("dnp-tui.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(std::env::temp_dir, std::path::Path::to_path_buf);
    let _ = std::fs::create_dir_all(&log_dir);
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("dnp-tui.log"));

    let file_appender = tracing_appender::rolling::never(&log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve the controller config: CLI flags over the selected profile.
fn controller_config(cli: &Cli) -> Result<ControllerConfig> {
    let cfg = dnp_config::load_config_or_default();
    let profile_name = cli
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into());

    let mut profile = cfg.profiles.get(&profile_name).cloned().unwrap_or_default();
    if let Some(ref url) = cli.url {
        profile.url.clone_from(url);
    }
    if let Some(ref token) = cli.token {
        profile = Profile {
            auth_mode: "token".into(),
            api_token: Some(token.clone()),
            ..profile
        };
    }
    if profile.url.is_empty() {
        bail!(
            "no backend configured for profile '{profile_name}'; \
             run `dnp config init` or pass --url and --token"
        );
    }

    Ok(dnp_config::profile_to_controller_config(
        &profile,
        &profile_name,
        &cfg.defaults,
    )?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks first, so a panic during init still restores the terminal
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = controller_config(&cli)?;
    info!(url = %config.url, "starting dnp-tui");

    let mut app = App::new(Controller::new(config));
    app.run().await?;

    Ok(())
}
