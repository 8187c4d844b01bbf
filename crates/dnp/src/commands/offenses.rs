//! Offense command handlers.

use tabled::Tabled;

use dnp_core::{
    Command as CoreCommand, CommandResult, Controller, CreateOffenseReportRequest, EntityId,
    EvidenceInput, EvidenceTier, Offense, OffenseFilter, Severity,
};

use crate::cli::{EvidenceTierArg, GlobalOpts, OffensesArgs, OffensesCommand, SeverityArg};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Flag conversions ────────────────────────────────────────────────

fn severity(arg: SeverityArg) -> Severity {
    match arg {
        SeverityArg::Minor => Severity::Minor,
        SeverityArg::Moderate => Severity::Moderate,
        SeverityArg::Severe => Severity::Severe,
        SeverityArg::Egregious => Severity::Egregious,
    }
}

fn tier(arg: EvidenceTierArg) -> EvidenceTier {
    match arg {
        EvidenceTierArg::A => EvidenceTier::A,
        EvidenceTierArg::B => EvidenceTier::B,
        EvidenceTierArg::C => EvidenceTier::C,
        EvidenceTierArg::D => EvidenceTier::D,
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OffenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Artist")]
    artist: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Date")]
    date: String,
}

fn row(o: &Offense, color: bool) -> OffenseRow {
    OffenseRow {
        id: o.id.to_string(),
        artist: o
            .artist_name
            .clone()
            .unwrap_or_else(|| o.artist_id.to_string()),
        category: o.category.clone(),
        severity: output::severity_cell(o.severity, color),
        state: o.procedural_state.to_string(),
        title: o.title.clone(),
        date: o.incident_date.map(|d| d.to_string()).unwrap_or_default(),
    }
}

fn detail(o: &Offense, color: bool) -> String {
    let mut lines = vec![
        format!("ID:        {}", o.id),
        format!(
            "Artist:    {} ({})",
            o.artist_name.as_deref().unwrap_or("-"),
            o.artist_id
        ),
        format!("Title:     {}", o.title),
        format!("Category:  {}", o.category),
        format!("Severity:  {}", output::severity_cell(o.severity, color)),
        format!("State:     {}", o.procedural_state),
        format!(
            "Date:      {}",
            o.incident_date.map_or_else(|| "-".into(), |d| d.to_string())
        ),
    ];
    if let Some(ref description) = o.description {
        lines.push(format!("Details:   {description}"));
    }
    lines.push(format!("Evidence:  {}", o.evidence.len()));
    for e in &o.evidence {
        let tier = e
            .tier
            .map_or_else(String::new, |t| format!("[{t}: {}] ", t.description()));
        let label = e
            .title
            .as_deref()
            .or(e.source_name.as_deref())
            .unwrap_or(&e.url);
        lines.push(format!("  {tier}{label}"));
        if label != e.url {
            lines.push(format!("    {}", e.url));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: OffensesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    match args.command {
        OffensesCommand::List {
            artist,
            category,
            severity: sev,
            limit,
        } => {
            let filter = OffenseFilter {
                artist_id: artist.map(EntityId::from),
                category,
                severity: sev.map(severity),
                limit,
            };
            let offenses = controller.list_offenses(&filter).await?;
            let out = output::render_list(
                &global.output,
                &offenses,
                |o| row(o, color),
                |o| o.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OffensesCommand::Get { offense } => {
            let offense = controller.get_offense(&EntityId::from(offense)).await?;
            let out = output::render_single(
                &global.output,
                &offense,
                |o| detail(o, color),
                |o| o.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OffensesCommand::Report {
            artist,
            category,
            severity: sev,
            title,
            description,
            date,
            evidence,
        } => {
            let incident_date = date
                .as_deref()
                .map(|d| util::parse_date("date", d))
                .transpose()?;
            let request = CreateOffenseReportRequest {
                artist_id: EntityId::from(artist),
                category,
                severity: severity(sev),
                title,
                description,
                incident_date,
                evidence: evidence.into_iter().map(EvidenceInput::new).collect(),
            };
            let result = controller
                .execute(CoreCommand::SubmitOffenseReport(request))
                .await?;
            if let CommandResult::Offense(offense) = result {
                if !global.quiet {
                    eprintln!("Offense report submitted");
                }
                let out = output::render_single(
                    &global.output,
                    &offense,
                    |o| detail(o, color),
                    |o| o.id.to_string(),
                );
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        OffensesCommand::AddEvidence {
            offense,
            url,
            title,
            source,
            tier: evidence_tier,
        } => {
            let evidence = EvidenceInput {
                url,
                title,
                source_name: source,
                tier: evidence_tier.map(tier),
            };
            let result = controller
                .execute(CoreCommand::AddEvidence {
                    offense_id: EntityId::from(offense.clone()),
                    evidence,
                })
                .await?;
            if let CommandResult::Evidence(evidence) = result {
                if !global.quiet {
                    eprintln!("Evidence added to offense {offense}");
                }
                let out = output::render_single(
                    &global.output,
                    &evidence,
                    |e| e.url.clone(),
                    |e| e.id.as_ref().map_or_else(|| e.url.clone(), ToString::to_string),
                );
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }
    }
}
