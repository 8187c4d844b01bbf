//! Platform connection command handlers.

use std::sync::Arc;

use tabled::Tabled;

use dnp_core::{Command as CoreCommand, Controller, Platform, PlatformConnection};

use crate::cli::{ConnectionsArgs, ConnectionsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ConnectionRow {
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Connected")]
    connected: String,
    #[tabled(rename = "Error")]
    error: String,
}

fn row(c: &Arc<PlatformConnection>, color: bool) -> ConnectionRow {
    ConnectionRow {
        platform: c.platform.display_name().to_owned(),
        status: output::connection_status_cell(&c.status, color),
        account: c.display_name.clone().unwrap_or_default(),
        connected: c
            .connected_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        error: c.error_message.clone().unwrap_or_default(),
    }
}

pub async fn handle(
    controller: &Controller,
    args: ConnectionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ConnectionsCommand::List => {
            let color = output::should_color(&global.color);
            let snap = controller.connections_snapshot();
            let out = output::render_list(
                &global.output,
                &snap,
                |c| row(c, color),
                |c| c.platform.as_str().to_owned(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConnectionsCommand::Disconnect { platform } => {
            let platform = Platform::from(platform);
            let known = controller
                .connections_snapshot()
                .iter()
                .any(|c| c.platform == platform);
            if !known {
                return Err(CliError::NotFound {
                    resource_type: "Connection".into(),
                    identifier: platform.to_string(),
                    list_command: "connections list".into(),
                });
            }

            if !util::confirm(
                "connections disconnect",
                &format!(
                    "Disconnect {}? Blocks will no longer be enforced there.",
                    platform.display_name()
                ),
                global.yes,
            )? {
                return Ok(());
            }

            controller
                .execute(CoreCommand::DisconnectPlatform {
                    platform: platform.clone(),
                })
                .await?;
            if !global.quiet {
                eprintln!("Disconnected {}", platform.display_name());
            }
            Ok(())
        }
    }
}
