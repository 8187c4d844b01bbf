//! Artist catalog command handlers.

use std::collections::HashSet;

use tabled::Tabled;

use dnp_core::{Artist, ArtistSearchResult, Controller, EntityId};

use crate::cli::{ArtistsArgs, ArtistsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SearchRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Genres")]
    genres: String,
    #[tabled(rename = "Offenses")]
    offenses: u32,
    #[tabled(rename = "Worst")]
    worst: String,
    #[tabled(rename = "Blocked")]
    blocked: &'static str,
}

fn search_row(a: &ArtistSearchResult, blocked: &HashSet<EntityId>, color: bool) -> SearchRow {
    SearchRow {
        id: a.id.to_string(),
        name: a.name.clone(),
        genres: a.genres.join(", "),
        offenses: a.offense_count,
        worst: a
            .max_severity
            .map(|s| output::severity_cell(s, color))
            .unwrap_or_default(),
        blocked: if blocked.contains(&a.id) { "yes" } else { "" },
    }
}

fn detail(a: &Artist, color: bool) -> String {
    let mut lines = vec![
        format!("ID:        {}", a.id),
        format!("Name:      {}", a.name),
        format!(
            "Genres:    {}",
            if a.genres.is_empty() {
                "-".into()
            } else {
                a.genres.join(", ")
            }
        ),
    ];
    let mut external: Vec<_> = a.external_ids.iter().collect();
    external.sort();
    for (platform, id) in external {
        lines.push(format!("{:<10} {id}", format!("{}:", platform.display_name())));
    }
    if a.offenses.is_empty() {
        lines.push("Offenses:  none documented".into());
    } else {
        lines.push(format!("Offenses:  {}", a.offenses.len()));
        for o in &a.offenses {
            let date = o
                .incident_date
                .map_or_else(|| "undated".into(), |d| d.to_string());
            lines.push(format!(
                "  [{}] {} ({}, {}, {date})",
                output::severity_cell(o.severity, color),
                o.title,
                o.category,
                o.procedural_state,
            ));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: ArtistsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    match args.command {
        ArtistsCommand::Search { query, limit } => {
            if query.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "query".into(),
                    reason: "must not be empty".into(),
                });
            }
            let results = controller.search_artists(&query, limit).await?;
            let blocked: HashSet<EntityId> = controller
                .blocked_view()
                .into_iter()
                .map(|b| b.artist_id)
                .collect();
            let out = output::render_list(
                &global.output,
                &results,
                |a| search_row(a, &blocked, color),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ArtistsCommand::Get { artist } => {
            let artist = controller.get_artist(&EntityId::from(artist)).await?;
            let out = output::render_single(
                &global.output,
                &artist,
                |a| detail(a, color),
                |a| a.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
