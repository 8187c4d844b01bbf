//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod analytics;
pub mod artists;
pub mod auth;
pub mod blocklist;
pub mod categories;
pub mod config_cmd;
pub mod connections;
pub mod exceptions;
pub mod offenses;
pub mod sync;
pub mod util;

use dnp_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Artists(args) => artists::handle(controller, args, global).await,
        Command::Blocklist(args) => blocklist::handle(controller, args, global).await,
        Command::Categories(args) => categories::handle(controller, args, global).await,
        Command::Exceptions(args) => exceptions::handle(controller, args, global).await,
        Command::Offenses(args) => offenses::handle(controller, args, global).await,
        Command::Connections(args) => connections::handle(controller, args, global).await,
        Command::Sync(args) => sync::handle(controller, args, global).await,
        Command::Analytics(args) => analytics::handle(controller, args, global).await,
        // Auth, Config and Completions are handled before dispatch
        Command::Auth(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
