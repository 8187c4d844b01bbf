//! Category exception command handlers.
//!
//! Exceptions are client-local: they live in the profile's exception file
//! and never reach the backend.

use tabled::Tabled;

use dnp_core::{Command as CoreCommand, Controller, EntityId};

use crate::cli::{ExceptionsArgs, ExceptionsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ExceptionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Artist")]
    name: String,
}

#[derive(serde::Serialize)]
struct ExceptionItem {
    artist_id: EntityId,
    name: Option<String>,
}

pub async fn handle(
    controller: &Controller,
    args: ExceptionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ExceptionsCommand::List => {
            let members = controller.category_members().latest();
            let mut items: Vec<ExceptionItem> = controller
                .exceptions()
                .snapshot()
                .iter()
                .map(|id| ExceptionItem {
                    artist_id: id.clone(),
                    name: members
                        .iter()
                        .flat_map(|list| list.iter())
                        .find(|m| &m.artist_id == id)
                        .map(|m| m.name.clone()),
                })
                .collect();
            items.sort_by(|a, b| a.name.cmp(&b.name));

            let out = output::render_list(
                &global.output,
                &items,
                |e| ExceptionRow {
                    id: e.artist_id.to_string(),
                    name: e
                        .name
                        .clone()
                        .unwrap_or_else(|| "(not in a subscribed category)".into()),
                },
                |e| e.artist_id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ExceptionsCommand::Add { artist } => {
            let artist_id = EntityId::from(artist);
            let blocked = controller
                .blocked_view()
                .into_iter()
                .find(|b| b.artist_id == artist_id);
            if blocked.is_none() && !global.quiet {
                eprintln!("Note: {artist_id} is not currently blocked");
            }
            controller
                .execute(CoreCommand::ExceptArtist {
                    artist_id: artist_id.clone(),
                })
                .await?;
            if !global.quiet {
                let name = blocked.map_or_else(|| artist_id.to_string(), |b| b.name);
                eprintln!("{name} is excepted from category blocks");
            }
            Ok(())
        }

        ExceptionsCommand::Remove { artist } => {
            let artist_id = EntityId::from(artist);
            controller
                .execute(CoreCommand::ReblockArtist {
                    artist_id: artist_id.clone(),
                })
                .await?;
            if !global.quiet {
                eprintln!("Removed exception for {artist_id}");
            }
            Ok(())
        }
    }
}
