//! DNP list command handlers.

use std::sync::Arc;

use tabled::Tabled;

use dnp_core::{
    BlockedArtist, Command as CoreCommand, CommandResult, Controller, DnpEntry, EnforcementTarget,
    EntityId,
};

use crate::cli::{BlocklistArgs, BlocklistCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Artist")]
    name: String,
    #[tabled(rename = "Tags")]
    tags: String,
    #[tabled(rename = "Note")]
    note: String,
    #[tabled(rename = "Added")]
    added: String,
}

impl From<&Arc<DnpEntry>> for EntryRow {
    fn from(e: &Arc<DnpEntry>) -> Self {
        Self {
            id: e.artist_id.to_string(),
            name: e.artist_name.clone(),
            tags: e.tags.join(", "),
            note: e.note.clone().unwrap_or_default(),
            added: e.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Tabled)]
struct BlockedRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Artist")]
    name: String,
    #[tabled(rename = "Blocked by")]
    sources: String,
}

impl From<&BlockedArtist> for BlockedRow {
    fn from(b: &BlockedArtist) -> Self {
        Self {
            id: b.artist_id.to_string(),
            name: b.name.clone(),
            sources: b.source_label(),
        }
    }
}

fn detail(e: &DnpEntry) -> String {
    [
        format!("Artist:    {} ({})", e.artist_name, e.artist_id),
        format!(
            "Tags:      {}",
            if e.tags.is_empty() {
                "-".into()
            } else {
                e.tags.join(", ")
            }
        ),
        format!("Note:      {}", e.note.as_deref().unwrap_or("-")),
        format!("Added:     {}", e.created_at.format("%Y-%m-%d %H:%M UTC")),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: BlocklistArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BlocklistCommand::List => {
            let snap = controller.dnp_entries_snapshot();
            let out = output::render_list(
                &global.output,
                &snap,
                |e| EntryRow::from(e),
                |e| e.artist_id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BlocklistCommand::Effective => {
            let view = controller.blocked_view();
            let out = output::render_list(
                &global.output,
                &view,
                |b| BlockedRow::from(b),
                |b| b.artist_id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BlocklistCommand::Add {
            artist,
            tags,
            note,
            wait,
        } => {
            let artist = controller.get_artist(&EntityId::from(artist)).await?;
            let result = controller
                .execute(CoreCommand::BlockArtist {
                    artist_id: artist.id.clone(),
                    artist_name: artist.name.clone(),
                    tags,
                    note,
                })
                .await?;
            if !global.quiet {
                eprintln!("Added {} to your do-not-play list", artist.name);
            }
            if let CommandResult::DnpEntry(entry) = result {
                let out = output::render_single(&global.output, &entry, detail, |e| {
                    e.artist_id.to_string()
                });
                output::print_output(&out, global.quiet);
            }
            let target = EnforcementTarget::Artist(artist.id);
            util::follow_enforcement(controller, &target, wait, global.quiet).await
        }

        BlocklistCommand::Remove { artist, wait } => {
            let artist_id = EntityId::from(artist);
            let name = controller
                .dnp_entries_snapshot()
                .iter()
                .find(|e| e.artist_id == artist_id)
                .map(|e| e.artist_name.clone())
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "DNP entry".into(),
                    identifier: artist_id.to_string(),
                    list_command: "blocklist list".into(),
                })?;

            if !util::confirm(
                "blocklist remove",
                &format!("Remove {name} from your do-not-play list?"),
                global.yes,
            )? {
                return Ok(());
            }

            controller
                .execute(CoreCommand::UnblockArtist {
                    artist_id: artist_id.clone(),
                })
                .await?;
            if !global.quiet {
                eprintln!("Removed {name} from your do-not-play list");
            }
            let target = EnforcementTarget::Artist(artist_id);
            util::follow_enforcement(controller, &target, wait, global.quiet).await
        }

        BlocklistCommand::Update { artist, tags, note } => {
            if tags.is_none() && note.is_none() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "pass --tag or --note".into(),
                });
            }
            let result = controller
                .execute(CoreCommand::UpdateEntry {
                    artist_id: EntityId::from(artist),
                    tags,
                    note,
                })
                .await?;
            if let CommandResult::DnpEntry(entry) = result {
                let out = output::render_single(&global.output, &entry, detail, |e| {
                    e.artist_id.to_string()
                });
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }
    }
}
