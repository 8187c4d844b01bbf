//! Category command handlers.

use std::sync::Arc;

use tabled::Tabled;

use dnp_core::{
    Category, CategoryMember, Command as CoreCommand, CommandResult, Controller, EnforcementTarget,
    EntityId,
};

use crate::cli::{CategoriesArgs, CategoriesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Artists")]
    artists: u32,
    #[tabled(rename = "Subscribed")]
    subscribed: &'static str,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Arc<Category>> for CategoryRow {
    fn from(c: &Arc<Category>) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            artists: c.artist_count,
            subscribed: if c.subscribed { "yes" } else { "" },
            description: c.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Artist")]
    name: String,
    #[tabled(rename = "Genres")]
    genres: String,
    #[tabled(rename = "Excepted")]
    excepted: &'static str,
}

fn detail(c: &Category) -> String {
    [
        format!("ID:          {}", c.id),
        format!("Name:        {}", c.name),
        format!("Artists:     {}", c.artist_count),
        format!("Subscribed:  {}", c.subscribed),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: CategoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CategoriesCommand::List => {
            let snap = controller.categories_snapshot();
            let out = output::render_list(
                &global.output,
                &snap,
                |c| CategoryRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CategoriesCommand::Members { category } => {
            let members = controller
                .list_category_members(&EntityId::from(category))
                .await?;
            let exceptions = controller.exceptions().snapshot();
            let out = output::render_list(
                &global.output,
                &members,
                |m: &CategoryMember| MemberRow {
                    id: m.artist_id.to_string(),
                    name: m.name.clone(),
                    genres: m.genres.join(", "),
                    excepted: if exceptions.contains(&m.artist_id) {
                        "yes"
                    } else {
                        ""
                    },
                },
                |m| m.artist_id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CategoriesCommand::Subscribe { category, wait } => {
            let id = EntityId::from(category.clone());
            let result = controller
                .execute(CoreCommand::SubscribeCategory { id: id.clone() })
                .await?;
            report(result, &category, "Subscribed to", global);
            let target = EnforcementTarget::Category(id);
            util::follow_enforcement(controller, &target, wait, global.quiet).await
        }

        CategoriesCommand::Unsubscribe { category, wait } => {
            let id = EntityId::from(category.clone());
            let result = controller
                .execute(CoreCommand::UnsubscribeCategory { id: id.clone() })
                .await?;
            report(result, &category, "Unsubscribed from", global);
            let target = EnforcementTarget::Category(id);
            util::follow_enforcement(controller, &target, wait, global.quiet).await
        }
    }
}

fn report(result: CommandResult, fallback: &str, verb: &str, global: &GlobalOpts) {
    match result {
        CommandResult::Category(c) => {
            if !global.quiet {
                eprintln!("{verb} {}", c.name);
            }
            let out = output::render_single(&global.output, &c, detail, |c| c.id.to_string());
            output::print_output(&out, global.quiet);
        }
        _ => {
            if !global.quiet {
                eprintln!("{verb} {fallback}");
            }
        }
    }
}
