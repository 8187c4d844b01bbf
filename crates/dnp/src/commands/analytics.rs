//! Analytics command handlers.

use tabled::Tabled;

use dnp_core::{
    Command as CoreCommand, CommandResult, Controller, DashboardStats, EntityId, Report,
    ReportFormat, ReportRequest, ReportType, TrendPoint,
};

use crate::cli::{AnalyticsArgs, AnalyticsCommand, GlobalOpts, ReportFormatArg, ReportTypeArg};
use crate::error::CliError;
use crate::output;

fn report_type(arg: ReportTypeArg) -> ReportType {
    match arg {
        ReportTypeArg::BlocklistSummary => ReportType::BlocklistSummary,
        ReportTypeArg::EnforcementHistory => ReportType::EnforcementHistory,
        ReportTypeArg::CategoryBreakdown => ReportType::CategoryBreakdown,
    }
}

fn report_format(arg: ReportFormatArg) -> ReportFormat {
    match arg {
        ReportFormatArg::Json => ReportFormat::Json,
        ReportFormatArg::Csv => ReportFormat::Csv,
        ReportFormatArg::Pdf => ReportFormat::Pdf,
    }
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Blocked")]
    blocked: u64,
    #[tabled(rename = "Unblocked")]
    unblocked: u64,
}

fn dashboard_detail(d: &DashboardStats) -> String {
    let mut lines = vec![
        format!("Blocked artists:        {}", d.total_blocked),
        format!("Category subscriptions: {}", d.category_subscriptions),
        format!("Platforms connected:    {}", d.platforms_connected),
        format!("Offenses tracked:       {}", d.offenses_tracked),
        format!("Blocks (last 30 days):  {}", d.blocks_last_30_days),
    ];
    if !d.top_categories.is_empty() {
        lines.push("Top categories:".into());
        for (name, count) in &d.top_categories {
            lines.push(format!("  {name:<22}{count}"));
        }
    }
    lines.join("\n")
}

fn report_detail(r: &Report) -> String {
    let mut lines = vec![
        format!("ID:        {}", r.id),
        format!("Type:      {}", r.report_type),
        format!("Status:    {}", r.status),
    ];
    if let Some(ref format) = r.format {
        lines.push(format!("Format:    {format}"));
    }
    if let Some(created) = r.created_at {
        lines.push(format!("Created:   {}", created.format("%Y-%m-%d %H:%M UTC")));
    }
    if let Some(ref url) = r.download_url {
        lines.push(format!("Download:  {url}"));
    }
    lines.join("\n")
}

pub async fn handle(
    controller: &Controller,
    args: AnalyticsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AnalyticsCommand::Dashboard => {
            let Some(stats) = controller.dashboard() else {
                return Err(CliError::NotFound {
                    resource_type: "Dashboard".into(),
                    identifier: "analytics/dashboard".into(),
                    list_command: "--help".into(),
                });
            };
            let out = output::render_single(
                &global.output,
                stats.as_ref(),
                dashboard_detail,
                |d| d.total_blocked.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AnalyticsCommand::Trends { days } => {
            let points = controller.get_trends(days).await?;
            let out = output::render_list(
                &global.output,
                &points,
                |p: &TrendPoint| TrendRow {
                    date: p.date.to_string(),
                    blocked: p.blocked,
                    unblocked: p.unblocked,
                },
                |p| format!("{}\t{}\t{}", p.date, p.blocked, p.unblocked),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AnalyticsCommand::Report {
            report_type: kind,
            format,
            days,
        } => {
            let request = ReportRequest {
                report_type: report_type(kind),
                format: report_format(format),
                days,
            };
            let result = controller
                .execute(CoreCommand::GenerateReport(request))
                .await?;
            if let CommandResult::Report(report) = result {
                if !global.quiet {
                    eprintln!(
                        "Report requested. Check progress with: dnp analytics report-status {}",
                        report.id
                    );
                }
                let out = output::render_single(&global.output, &report, report_detail, |r| {
                    r.id.to_string()
                });
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        AnalyticsCommand::ReportStatus { report } => {
            let report = controller.get_report(&EntityId::from(report)).await?;
            let out = output::render_single(&global.output, &report, report_detail, |r| {
                r.download_url.clone().unwrap_or_else(|| r.status.to_string())
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
