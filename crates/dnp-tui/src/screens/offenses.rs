//! Offenses screen -- documented offenses with severity and artist
//! filters, plus an evidence detail view.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap,
};

use dnp_core::{EntityId, Offense, OffenseFilter, Severity};

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;
use crate::widgets::{nav, sub_tabs, time_fmt};

/// Page size for offense listings.
const LIMIT: u32 = 200;

/// `None` → Minor → Moderate → Severe → Egregious → `None`.
fn next_severity(current: Option<Severity>) -> Option<Severity> {
    match current {
        None => Some(Severity::Minor),
        Some(Severity::Minor) => Some(Severity::Moderate),
        Some(Severity::Moderate) => Some(Severity::Severe),
        Some(Severity::Severe) => Some(Severity::Egregious),
        Some(Severity::Egregious | Severity::Unknown) => None,
    }
}

pub struct OffensesScreen {
    focused: bool,
    offenses: Arc<Vec<Offense>>,
    artist: Option<(EntityId, String)>,
    severity: Option<Severity>,
    loading: bool,
    loaded_once: bool,
    detail: Option<Offense>,
    detail_scroll: u16,
    table: TableState,
}

impl OffensesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            offenses: Arc::new(Vec::new()),
            artist: None,
            severity: None,
            loading: false,
            loaded_once: false,
            detail: None,
            detail_scroll: 0,
            table: TableState::default(),
        }
    }

    fn filter(&self) -> OffenseFilter {
        OffenseFilter {
            artist_id: self.artist.as_ref().map(|(id, _)| id.clone()),
            severity: self.severity,
            limit: Some(LIMIT),
            ..OffenseFilter::default()
        }
    }

    fn reload(&mut self) -> Action {
        self.loading = true;
        self.loaded_once = true;
        self.detail = None;
        Action::LoadOffenses(self.filter())
    }

    fn selected(&self) -> Option<&Offense> {
        self.table.selected().and_then(|i| self.offenses.get(i))
    }

    fn filter_label(&self) -> String {
        let mut parts = Vec::new();
        if let Some((_, ref name)) = self.artist {
            parts.push(format!("artist: {name}"));
        }
        if let Some(sev) = self.severity {
            parts.push(format!("severity: {sev}"));
        }
        if parts.is_empty() {
            "all".into()
        } else {
            parts.join("  ")
        }
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        if self.offenses.is_empty() {
            let msg = if self.loading {
                "  Loading offenses…"
            } else {
                "  No offenses match the current filter."
            };
            frame.render_widget(Paragraph::new(Span::styled(msg, theme::key_hint())), area);
            return;
        }

        let header = Row::new(vec![
            Cell::from("Severity"),
            Cell::from("Artist"),
            Cell::from("Category"),
            Cell::from("Title"),
            Cell::from("State"),
            Cell::from("Evidence"),
        ])
        .style(theme::table_header());

        let rows: Vec<Row> = self
            .offenses
            .iter()
            .map(|o| {
                let evidence = match o.strongest_tier() {
                    Some(tier) => format!("{} (tier {tier})", o.evidence.len()),
                    None => o.evidence.len().to_string(),
                };
                Row::new(vec![
                    Cell::from(o.severity.to_string())
                        .style(Style::default().fg(theme::severity_color(o.severity))),
                    Cell::from(o.artist_name.clone().unwrap_or_else(|| o.artist_id.to_string())),
                    Cell::from(o.category.clone()).style(Style::default().fg(theme::CYAN)),
                    Cell::from(o.title.clone()),
                    Cell::from(o.procedural_state.to_string()).style(theme::key_hint()),
                    Cell::from(evidence),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(10),
            Constraint::Length(20),
            Constraint::Length(16),
            Constraint::Min(20),
            Constraint::Length(20),
            Constraint::Length(12),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());
        frame.render_stateful_widget(table, area, &mut self.table.clone());
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, o: &Offense) {
        let label = |s: &'static str| Span::styled(format!("{s:<11}"), theme::key_hint());
        let heading = |s: String| {
            Line::from(Span::styled(
                s,
                Style::default().fg(theme::CYAN).add_modifier(Modifier::BOLD),
            ))
        };

        let mut lines = vec![
            heading(o.title.clone()),
            Line::from(""),
            Line::from(vec![
                label("Artist"),
                Span::raw(o.artist_name.clone().unwrap_or_else(|| o.artist_id.to_string())),
            ]),
            Line::from(vec![label("Category"), Span::raw(o.category.clone())]),
            Line::from(vec![
                label("Severity"),
                Span::styled(
                    o.severity.to_string(),
                    Style::default().fg(theme::severity_color(o.severity)),
                ),
            ]),
            Line::from(vec![label("State"), Span::raw(o.procedural_state.to_string())]),
            Line::from(vec![
                label("Incident"),
                Span::raw(
                    o.incident_date
                        .map_or_else(|| "unknown".to_owned(), |d| d.to_string()),
                ),
            ]),
            Line::from(vec![label("Recorded"), Span::raw(time_fmt::ago(o.created_at))]),
        ];

        if let Some(ref desc) = o.description {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(desc.clone(), theme::table_row())));
        }

        lines.push(Line::from(""));
        lines.push(heading(format!("Evidence ({})", o.evidence.len())));
        for ev in &o.evidence {
            let tier = ev.tier.map_or_else(
                || Span::styled("[?] unrated", theme::key_hint()),
                |t| {
                    Span::styled(
                        format!("[{t}] {}", t.description()),
                        Style::default().fg(theme::YELLOW),
                    )
                },
            );
            lines.push(Line::from(vec![Span::raw("  "), tier]));

            let title = ev.title.clone().unwrap_or_else(|| ev.url.clone());
            let mut meta = Vec::new();
            if let Some(ref src) = ev.source_name {
                meta.push(src.clone());
            }
            if let Some(date) = ev.published {
                meta.push(date.to_string());
            }
            if let Some(cred) = ev.credibility {
                meta.push(format!("credibility {cred:.1}"));
            }
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(title, theme::table_row()),
            ]));
            if !meta.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", meta.join(" · ")),
                    theme::key_hint(),
                )));
            }
            lines.push(Line::from(Span::styled(
                format!("    {}", ev.url),
                Style::default().fg(theme::MUTED).add_modifier(Modifier::UNDERLINED),
            )));
        }

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((self.detail_scroll, 0)),
            area,
        );
    }
}

impl Component for OffensesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.detail.is_some() {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => {
                    self.detail = None;
                    None
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    self.detail_scroll = self.detail_scroll.saturating_add(1);
                    None
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.detail_scroll = self.detail_scroll.saturating_sub(1);
                    None
                }
                _ => None,
            });
        }

        if nav::handle_key(key, &mut self.table, self.offenses.len()) {
            return Ok(None);
        }
        Ok(match key.code {
            KeyCode::Enter => self.selected().map(|o| Action::LoadOffense(o.id.clone())),
            KeyCode::Char('s') => {
                self.severity = next_severity(self.severity);
                Some(self.reload())
            }
            KeyCode::Char('a') if self.artist.is_some() => {
                self.artist = None;
                Some(self.reload())
            }
            KeyCode::Char('r') => Some(self.reload()),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SwitchScreen(ScreenId::Offenses) if !self.loaded_once => {
                return Ok(Some(self.reload()));
            }
            Action::ShowArtistOffenses { artist_id, name } => {
                self.artist = Some((artist_id.clone(), name.clone()));
                return Ok(Some(self.reload()));
            }
            Action::OffensesLoaded(offenses) => {
                self.loading = false;
                self.offenses = Arc::clone(offenses);
                nav::clamp(&mut self.table, self.offenses.len());
            }
            Action::OffenseLoaded(offense) => {
                self.detail = Some((**offense).clone());
                self.detail_scroll = 0;
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match self.detail {
            Some(_) => " Offense ".to_owned(),
            None => format!(" Offenses ({}) ", self.offenses.len()),
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // filter
            Constraint::Min(1),    // content
            Constraint::Length(1), // hints
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Filter ", theme::key_hint()),
                Span::styled(self.filter_label(), Style::default().fg(theme::ACCENT)),
            ])),
            layout[0],
        );

        let hints = if let Some(ref offense) = self.detail {
            self.render_detail(frame, layout[1], offense);
            sub_tabs::render_hints(&[("j/k", "scroll"), ("Esc", "back")])
        } else {
            self.render_list(frame, layout[1]);
            sub_tabs::render_hints(&[
                ("j/k", "navigate"),
                ("Enter", "evidence"),
                ("s", "severity"),
                ("a", "all artists"),
                ("r", "reload"),
            ])
        };
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;

    fn press(screen: &mut OffensesScreen, c: char) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn severity_filter_cycles_back_to_all() {
        let mut s = None;
        for _ in 0..5 {
            s = next_severity(s);
        }
        assert_eq!(s, None);
    }

    #[test]
    fn first_visit_loads_once() {
        let mut screen = OffensesScreen::new();
        let first = screen
            .update(&Action::SwitchScreen(ScreenId::Offenses))
            .unwrap();
        assert!(matches!(first, Some(Action::LoadOffenses(_))));
        let again = screen
            .update(&Action::SwitchScreen(ScreenId::Offenses))
            .unwrap();
        assert!(again.is_none());
    }

    #[test]
    fn artist_filter_narrows_and_clears() {
        let mut screen = OffensesScreen::new();
        let action = screen
            .update(&Action::ShowArtistOffenses {
                artist_id: EntityId::from("a1"),
                name: "Alpha".into(),
            })
            .unwrap();
        let Some(Action::LoadOffenses(filter)) = action else {
            panic!("expected a load");
        };
        assert_eq!(filter.artist_id, Some(EntityId::from("a1")));
        assert_eq!(screen.filter_label(), "artist: Alpha");

        let Some(Action::LoadOffenses(filter)) = press(&mut screen, 's') else {
            panic!("expected a load");
        };
        assert_eq!(filter.severity, Some(Severity::Minor));

        let Some(Action::LoadOffenses(filter)) = press(&mut screen, 'a') else {
            panic!("expected a load");
        };
        assert_eq!(filter.artist_id, None);
        assert_eq!(screen.filter_label(), "severity: minor");
        // Nothing left to clear
        assert!(press(&mut screen, 'a').is_none());
    }
}
