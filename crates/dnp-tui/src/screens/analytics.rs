//! Analytics screen -- dashboard totals, block/unblock trends and
//! report generation.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph,
};

use dnp_core::{DashboardStats, ReportType, TrendPoint};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::sub_tabs;

/// Trend windows offered by `p`, in days.
const PERIODS: [u32; 3] = [7, 30, 90];

const REPORT_TYPES: [ReportType; 3] = [
    ReportType::BlocklistSummary,
    ReportType::EnforcementHistory,
    ReportType::CategoryBreakdown,
];

fn report_label(report: ReportType) -> &'static str {
    match report {
        ReportType::BlocklistSummary => "Blocklist summary",
        ReportType::EnforcementHistory => "Enforcement history",
        ReportType::CategoryBreakdown => "Category breakdown",
    }
}

/// Chart series `(day index, value)` for blocked and unblocked counts.
#[allow(clippy::cast_precision_loss)]
fn series(points: &[TrendPoint]) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| ((i as f64, p.blocked as f64), (i as f64, p.unblocked as f64)))
        .unzip()
}

pub struct AnalyticsScreen {
    focused: bool,
    stats: Option<Arc<DashboardStats>>,
    period_index: usize,
    trends: Arc<Vec<TrendPoint>>,
    trends_days: Option<u32>,
    report_index: usize,
}

impl AnalyticsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            stats: None,
            period_index: 1,
            trends: Arc::new(Vec::new()),
            trends_days: None,
            report_index: 0,
        }
    }

    fn days(&self) -> u32 {
        PERIODS[self.period_index % PERIODS.len()]
    }

    fn report_type(&self) -> ReportType {
        REPORT_TYPES[self.report_index % REPORT_TYPES.len()]
    }

    fn render_totals(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Overview ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(ref stats) = self.stats else {
            frame.render_widget(
                Paragraph::new(Span::styled("  Loading dashboard…", theme::key_hint())),
                inner,
            );
            return;
        };

        let stat = |label: &'static str, value: u64| {
            Line::from(vec![
                Span::styled(format!("  {label:<24}"), theme::key_hint()),
                Span::styled(
                    value.to_string(),
                    Style::default().fg(theme::CYAN).add_modifier(Modifier::BOLD),
                ),
            ])
        };
        let lines = vec![
            stat("Artists blocked", stats.total_blocked),
            stat("Category subscriptions", stats.category_subscriptions),
            stat("Platforms connected", stats.platforms_connected),
            stat("Offenses tracked", stats.offenses_tracked),
            stat("Blocks, last 30 days", stats.blocks_last_30_days),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn render_top_categories(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Top categories ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let top = self
            .stats
            .as_ref()
            .map(|s| s.top_categories.as_slice())
            .unwrap_or_default();
        if top.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  No category data", theme::key_hint())),
                inner,
            );
            return;
        }

        let max = top.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1);
        let bar_budget = usize::from(inner.width.saturating_sub(24));
        let lines: Vec<Line> = top
            .iter()
            .take(usize::from(inner.height))
            .map(|(name, count)| {
                let width = (*count as f64 / max as f64 * bar_budget as f64).round() as usize;
                let display: String = name.chars().take(14).collect();
                Line::from(vec![
                    Span::styled(format!("  {display:<14} "), theme::table_row()),
                    Span::styled("█".repeat(width), Style::default().fg(theme::ACCENT)),
                    Span::styled(format!(" {count}"), theme::key_hint()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    #[allow(clippy::cast_precision_loss)]
    fn render_trends(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Trends, last {} days ", self.days()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        if self.trends_days != Some(self.days()) || self.trends.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = if self.trends_days == Some(self.days()) {
                "  No activity in this period"
            } else {
                "  Loading trends…"
            };
            frame.render_widget(Paragraph::new(Span::styled(msg, theme::key_hint())), inner);
            return;
        }

        let (blocked, unblocked) = series(&self.trends);
        let x_max = (self.trends.len().saturating_sub(1) as f64).max(1.0);
        let y_max = blocked
            .iter()
            .chain(unblocked.iter())
            .map(|&(_, y)| y)
            .fold(1.0_f64, f64::max)
            * 1.2;

        let datasets = vec![
            Dataset::default()
                .name("blocked")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme::CORAL))
                .data(&blocked),
            Dataset::default()
                .name("unblocked")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme::GREEN))
                .data(&unblocked),
        ];

        let first = self.trends.first().map(|p| p.date.to_string()).unwrap_or_default();
        let last = self.trends.last().map(|p| p.date.to_string()).unwrap_or_default();
        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .labels(vec![Span::raw(first), Span::raw(last)])
                    .style(theme::key_hint()),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, y_max])
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format!("{:.0}", y_max / 1.2)),
                    ])
                    .style(theme::key_hint()),
            );
        frame.render_widget(chart, area);
    }
}

impl Component for AnalyticsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Char('p') => {
                self.period_index = (self.period_index + 1) % PERIODS.len();
                Some(Action::LoadTrends(self.days()))
            }
            KeyCode::Char('t') => {
                self.report_index = (self.report_index + 1) % REPORT_TYPES.len();
                None
            }
            KeyCode::Char('g') => Some(Action::RequestReport(self.report_type())),
            KeyCode::Char('r') => Some(Action::LoadTrends(self.days())),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SwitchScreen(ScreenId::Analytics) if self.trends_days.is_none() => {
                return Ok(Some(Action::LoadTrends(self.days())));
            }
            Action::DashboardUpdated(stats) => {
                self.stats.clone_from(stats);
            }
            // Answers for a period no longer shown are dropped
            Action::TrendsLoaded(days, points) if *days == self.days() => {
                self.trends = Arc::clone(points);
                self.trends_days = Some(*days);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(7),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
        let top = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(layout[0]);

        self.render_totals(frame, top[0]);
        self.render_top_categories(frame, top[1]);
        self.render_trends(frame, layout[1]);

        let labels: Vec<&str> = REPORT_TYPES.iter().map(|r| report_label(*r)).collect();
        let mut report_line = sub_tabs::render_sub_tabs(&labels, self.report_index);
        report_line.spans.insert(0, Span::styled(" Report ", theme::key_hint()));
        frame.render_widget(Paragraph::new(report_line), layout[2]);

        frame.render_widget(
            Paragraph::new(sub_tabs::render_hints(&[
                ("p", "period"),
                ("t", "report type"),
                ("g", "generate report"),
                ("r", "reload"),
            ])),
            layout[3],
        );
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;

    fn point(day: u32, blocked: u64, unblocked: u64) -> TrendPoint {
        TrendPoint {
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            blocked,
            unblocked,
        }
    }

    #[test]
    fn series_splits_by_day_index() {
        let (blocked, unblocked) = series(&[point(1, 3, 0), point(2, 1, 2)]);
        assert_eq!(blocked, vec![(0.0, 3.0), (1.0, 1.0)]);
        assert_eq!(unblocked, vec![(0.0, 0.0), (1.0, 2.0)]);
    }

    #[test]
    fn stale_trend_answers_are_ignored() {
        let mut screen = AnalyticsScreen::new();
        assert_eq!(screen.days(), 30);

        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE))
            .unwrap();
        assert!(matches!(action, Some(Action::LoadTrends(90))));

        // The 30-day answer arrives after the switch to 90 days
        screen
            .update(&Action::TrendsLoaded(30, Arc::new(vec![point(1, 1, 1)])))
            .unwrap();
        assert_eq!(screen.trends_days, None);

        screen
            .update(&Action::TrendsLoaded(90, Arc::new(vec![point(1, 4, 0)])))
            .unwrap();
        assert_eq!(screen.trends_days, Some(90));
    }

    #[test]
    fn report_type_cycles() {
        let mut screen = AnalyticsScreen::new();
        let t = KeyEvent::new(KeyCode::Char('t'), KeyModifiers::NONE);
        let g = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE);
        screen.handle_key_event(t).unwrap();
        let action = screen.handle_key_event(g).unwrap();
        assert!(matches!(
            action,
            Some(Action::RequestReport(ReportType::EnforcementHistory))
        ));
    }
}
