//! Enforcement progress panel: one block per in-flight block/unblock,
//! with a per-platform status line.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::{Throbber, ThrobberState};

use dnp_core::{EnforcementAction, EnforcementOperation, PlatformStatus};

use crate::theme;

fn status_span(status: PlatformStatus, spinner: &Span<'static>) -> Span<'static> {
    match status {
        PlatformStatus::Pending => Span::styled("·", theme::key_hint()),
        PlatformStatus::InProgress => spinner.clone(),
        PlatformStatus::Completed => Span::styled("✓", Style::default().fg(theme::GREEN)),
        PlatformStatus::Failed => Span::styled("✗", Style::default().fg(theme::RED)),
    }
}

/// Lines describing one operation. `spinner` stands in for platforms
/// that are still in progress.
pub fn operation_lines(op: &EnforcementOperation, spinner: &Span<'static>) -> Vec<Line<'static>> {
    let verb = match op.action {
        EnforcementAction::Block => "Blocking",
        EnforcementAction::Unblock => "Unblocking",
    };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = (op.progress() * 100.0).round() as u8;

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {verb} "), theme::key_hint()),
        Span::styled(
            op.label(),
            Style::default().fg(theme::CYAN).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  {pct}%"), theme::key_hint()),
    ])];

    if op.platforms.is_empty() {
        lines.push(Line::from(Span::styled(
            "   no active platform connections",
            theme::key_hint(),
        )));
    }

    for (platform, progress) in &op.platforms {
        let mut spans = vec![
            Span::raw("   "),
            status_span(progress.status, spinner),
            Span::raw(" "),
            Span::styled(platform.display_name().to_owned(), theme::table_row()),
        ];
        if let Some(ref err) = progress.error {
            spans.push(Span::styled(format!("  {err}"), Style::default().fg(theme::RED)));
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// Rows the panel needs for `ops`, borders included.
pub fn panel_height(ops: &[EnforcementOperation]) -> u16 {
    let body: usize = ops.iter().map(|op| 1 + op.platforms.len().max(1)).sum();
    u16::try_from(body + 2).unwrap_or(u16::MAX)
}

/// Draw the panel into `area`.
pub fn render(frame: &mut Frame, area: Rect, ops: &[EnforcementOperation], state: &ThrobberState) {
    let spinner = Throbber::default()
        .throbber_style(Style::default().fg(theme::ACCENT))
        .to_symbol_span(state);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        area,
    );

    let active = ops.iter().filter(|op| !op.is_complete()).count();
    let block = Block::default()
        .title(format!(" Enforcement ({active} active) "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = ops
        .iter()
        .flat_map(|op| operation_lines(op, &spinner))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use tokio::time::Instant;

    use pretty_assertions::assert_eq;

    use dnp_core::{EnforcementTarget, EntityId, Platform, PlatformProgress};

    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn op(platforms: Vec<(Platform, PlatformStatus, Option<&str>)>) -> EnforcementOperation {
        EnforcementOperation {
            target: EnforcementTarget::Artist(EntityId::from("a1")),
            name: "Alpha".into(),
            action: EnforcementAction::Block,
            generation: 1,
            platforms: platforms
                .into_iter()
                .map(|(p, status, err)| {
                    (
                        p,
                        PlatformProgress {
                            status,
                            error: err.map(str::to_owned),
                        },
                    )
                })
                .collect::<BTreeMap<_, _>>(),
            job_id: None,
            started_at: Instant::now(),
            completed_at: None,
        }
    }

    #[test]
    fn platform_lines_show_status_and_errors() {
        let spinner = Span::raw("*");
        let lines = operation_lines(
            &op(vec![
                (Platform::Spotify, PlatformStatus::Completed, None),
                (Platform::Tidal, PlatformStatus::InProgress, None),
                (Platform::Deezer, PlatformStatus::Failed, Some("token expired")),
            ]),
            &spinner,
        );
        let rendered: Vec<String> = lines.iter().map(text).collect();
        assert_eq!(rendered[0], " Blocking Alpha  67%");
        assert!(rendered.contains(&"   * Tidal".to_owned()));
        assert!(rendered.iter().any(|l| l.contains("✗") && l.ends_with("token expired")));
    }

    #[test]
    fn operation_without_platforms_says_so() {
        let lines = operation_lines(&op(Vec::new()), &Span::raw("*"));
        assert_eq!(lines.len(), 2);
        assert_eq!(text(&lines[0]), " Blocking Alpha  100%");
        assert_eq!(panel_height(&[op(Vec::new())]), 4);
    }

    #[test]
    fn category_operation_is_titled_with_the_category() {
        let mut unsubscribe = op(vec![(Platform::Spotify, PlatformStatus::Pending, None)]);
        unsubscribe.target = EnforcementTarget::Category(EntityId::from("c1"));
        unsubscribe.name = "Violence".into();
        unsubscribe.action = EnforcementAction::Unblock;

        let lines = operation_lines(&unsubscribe, &Span::raw("*"));
        assert_eq!(text(&lines[0]), " Unblocking category Violence  0%");
    }
}
