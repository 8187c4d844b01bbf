//! Search screen -- debounced artist search with block/unblock actions
//! and an artist detail pane.

use std::collections::HashSet;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap,
};
use tui_input::{Input, InputRequest};

use dnp_core::{Artist, ArtistSearchResult, EntityId, SearchState};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::{nav, sub_tabs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Input,
    Results,
}

/// How an artist is currently blocked, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockMark {
    Direct,
    Category,
}

pub struct SearchScreen {
    focused: bool,
    focus: Focus,
    input: Input,
    state: SearchState,
    table: TableState,
    direct_ids: HashSet<EntityId>,
    category_ids: HashSet<EntityId>,
    detail: Option<Artist>,
}

impl SearchScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            focus: Focus::Input,
            input: Input::default(),
            state: SearchState::default(),
            table: TableState::default(),
            direct_ids: HashSet::new(),
            category_ids: HashSet::new(),
            detail: None,
        }
    }

    fn selected(&self) -> Option<&ArtistSearchResult> {
        self.table
            .selected()
            .and_then(|i| self.state.results.get(i))
    }

    fn mark(&self, id: &EntityId) -> Option<BlockMark> {
        if self.direct_ids.contains(id) {
            Some(BlockMark::Direct)
        } else if self.category_ids.contains(id) {
            Some(BlockMark::Category)
        } else {
            None
        }
    }

    fn edit(&mut self, req: InputRequest) -> Option<Action> {
        let changed = self.input.handle(req)?;
        changed
            .value
            .then(|| Action::SearchInput(self.input.value().to_owned()))
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc | KeyCode::Down | KeyCode::Enter => {
                self.focus = Focus::Results;
                nav::clamp(&mut self.table, self.state.results.len());
                None
            }
            KeyCode::Char('u') if ctrl => self.edit(InputRequest::DeleteLine),
            KeyCode::Char('w') if ctrl => self.edit(InputRequest::DeletePrevWord),
            KeyCode::Char(c) if !ctrl => self.edit(InputRequest::InsertChar(c)),
            KeyCode::Backspace => self.edit(InputRequest::DeletePrevChar),
            KeyCode::Delete => self.edit(InputRequest::DeleteNextChar),
            KeyCode::Left => {
                self.input.handle(InputRequest::GoToPrevChar);
                None
            }
            KeyCode::Right => {
                self.input.handle(InputRequest::GoToNextChar);
                None
            }
            KeyCode::Home => {
                self.input.handle(InputRequest::GoToStart);
                None
            }
            KeyCode::End => {
                self.input.handle(InputRequest::GoToEnd);
                None
            }
            _ => None,
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> Option<Action> {
        if nav::handle_key(key, &mut self.table, self.state.results.len()) {
            return None;
        }
        match key.code {
            KeyCode::Char('/' | 'i') => {
                self.focus = Focus::Input;
                None
            }
            KeyCode::Esc if self.detail.is_some() => {
                self.detail = None;
                None
            }
            KeyCode::Char('b') => {
                let artist = self.selected()?;
                if self.mark(&artist.id) == Some(BlockMark::Direct) {
                    return Some(Action::Notify(Notification::info(format!(
                        "{} is already on your DNP list",
                        artist.name
                    ))));
                }
                Some(Action::RequestBlock {
                    artist_id: artist.id.clone(),
                    name: artist.name.clone(),
                })
            }
            KeyCode::Char('u') => {
                let artist = self.selected()?;
                if self.mark(&artist.id) != Some(BlockMark::Direct) {
                    return Some(Action::Notify(Notification::info(format!(
                        "{} is not on your DNP list",
                        artist.name
                    ))));
                }
                Some(Action::RequestUnblock {
                    artist_id: artist.id.clone(),
                    name: artist.name.clone(),
                })
            }
            KeyCode::Enter => self.selected().map(|a| Action::LoadArtist(a.id.clone())),
            KeyCode::Char('o') => self.selected().map(|a| Action::ShowArtistOffenses {
                artist_id: a.id.clone(),
                name: a.name.clone(),
            }),
            _ => None,
        }
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let editing = self.focus == Focus::Input;
        let block = Block::default()
            .title(" Artist ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if editing {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = usize::from(inner.width.max(1) - 1);
        let scroll = self.input.visual_scroll(width);
        #[allow(clippy::cast_possible_truncation)]
        let paragraph = Paragraph::new(self.input.value())
            .style(Style::default().fg(theme::TEXT))
            .scroll((0, scroll as u16));
        frame.render_widget(paragraph, inner);

        if editing && self.focused {
            #[allow(clippy::cast_possible_truncation)]
            let x = self.input.visual_cursor().saturating_sub(scroll) as u16;
            frame.set_cursor_position(Position::new(inner.x + x, inner.y));
        }
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let title = if self.state.in_flight {
            format!(" Results ({}) searching… ", self.state.results.len())
        } else {
            format!(" Results ({}) ", self.state.results.len())
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focus == Focus::Results {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.state.results.is_empty() {
            let msg = if self.state.query.is_empty() {
                "  Type an artist name to search the catalog."
            } else if self.state.in_flight {
                "  Searching…"
            } else {
                "  No artists found."
            };
            frame.render_widget(Paragraph::new(Span::styled(msg, theme::key_hint())), inner);
            return;
        }

        let header = Row::new(vec![
            Cell::from(""),
            Cell::from("Artist"),
            Cell::from("Genres"),
            Cell::from("Offenses"),
        ])
        .style(theme::table_header());

        let rows: Vec<Row> = self
            .state
            .results
            .iter()
            .map(|a| {
                let mark = match self.mark(&a.id) {
                    Some(BlockMark::Direct) => {
                        Span::styled("●", Style::default().fg(theme::CORAL))
                    }
                    Some(BlockMark::Category) => {
                        Span::styled("◐", Style::default().fg(theme::YELLOW))
                    }
                    None => Span::raw(" "),
                };
                let offenses = match a.max_severity {
                    Some(sev) if a.has_offenses => Span::styled(
                        format!("{} ({sev})", a.offense_count),
                        Style::default().fg(theme::severity_color(sev)),
                    ),
                    _ if a.has_offenses => Span::raw(a.offense_count.to_string()),
                    _ => Span::styled("-", theme::key_hint()),
                };
                Row::new(vec![
                    Cell::from(mark),
                    Cell::from(a.name.clone()),
                    Cell::from(a.genres.join(", ")).style(theme::key_hint()),
                    Cell::from(offenses),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(1),
            Constraint::Min(20),
            Constraint::Percentage(35),
            Constraint::Length(16),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());
        frame.render_stateful_widget(table, inner, &mut self.table.clone());
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, artist: &Artist) {
        let block = Block::default()
            .title(format!(" {} ", artist.name))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label = |s: &'static str| Span::styled(format!("{s:<10}"), theme::key_hint());
        let status = match self.mark(&artist.id) {
            Some(BlockMark::Direct) => {
                Span::styled("on your DNP list", Style::default().fg(theme::CORAL))
            }
            Some(BlockMark::Category) => {
                Span::styled("blocked by a category", Style::default().fg(theme::YELLOW))
            }
            None => Span::styled("playable", Style::default().fg(theme::GREEN)),
        };

        let mut lines = vec![
            Line::from(vec![label("Status"), status]),
            Line::from(vec![label("Genres"), Span::raw(artist.genres.join(", "))]),
        ];
        let mut ids: Vec<_> = artist.external_ids.iter().collect();
        ids.sort_by_key(|(p, _)| p.display_name().to_owned());
        for (platform, id) in ids {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<10}", platform.display_name()), theme::key_hint()),
                Span::raw(id.clone()),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Offenses ({})", artist.offenses.len()),
            Style::default().fg(theme::CYAN).add_modifier(Modifier::BOLD),
        )));
        for o in &artist.offenses {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<10}", o.severity.to_string()),
                    Style::default().fg(theme::severity_color(o.severity)),
                ),
                Span::raw(o.title.clone()),
                Span::styled(format!("  {}", o.procedural_state), theme::key_hint()),
            ]));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}

impl Component for SearchScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::Results => self.handle_results_key(key),
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SearchUpdated(state) => {
                self.state = state.clone();
                nav::clamp(&mut self.table, self.state.results.len());
            }
            Action::BlockedViewUpdated(view) => {
                self.category_ids = view
                    .iter()
                    .filter(|b| !b.is_direct())
                    .map(|b| b.artist_id.clone())
                    .collect();
            }
            Action::DnpEntriesUpdated(entries) => {
                // From the raw list: excepted direct entries are missing
                // from the blocked view but can still be unblocked.
                self.direct_ids = entries.iter().map(|e| e.artist_id.clone()).collect();
            }
            Action::ArtistLoaded(artist) => {
                self.detail = Some((**artist).clone());
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Length(3), // input
            Constraint::Min(1),    // results (+ detail)
            Constraint::Length(1), // error / hints
        ])
        .split(area);

        self.render_input(frame, layout[0]);

        if let Some(ref artist) = self.detail {
            let cols = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(layout[1]);
            self.render_results(frame, cols[0]);
            self.render_detail(frame, cols[1], artist);
        } else {
            self.render_results(frame, layout[1]);
        }

        let footer = if let Some(ref err) = self.state.last_error {
            Line::from(Span::styled(
                format!(" search failed: {err}"),
                Style::default().fg(theme::RED),
            ))
        } else if self.focus == Focus::Input {
            sub_tabs::render_hints(&[
                ("Enter/↓", "results"),
                ("Ctrl+u", "clear"),
                ("Esc", "leave input"),
            ])
        } else {
            sub_tabs::render_hints(&[
                ("j/k", "navigate"),
                ("b", "block"),
                ("u", "unblock"),
                ("Enter", "details"),
                ("o", "offenses"),
                ("/", "edit query"),
            ])
        };
        frame.render_widget(Paragraph::new(footer), layout[2]);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn captures_input(&self) -> bool {
        self.focus == Focus::Input
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use dnp_core::{BlockSource, BlockedArtist, DnpEntry};

    use super::*;

    fn press(screen: &mut SearchScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn result(id: &str, name: &str) -> ArtistSearchResult {
        ArtistSearchResult {
            id: EntityId::from(id),
            name: name.into(),
            genres: Vec::new(),
            image_url: None,
            has_offenses: false,
            offense_count: 0,
            max_severity: None,
        }
    }

    fn entry(id: &str, name: &str) -> DnpEntry {
        DnpEntry {
            artist_id: EntityId::from(id),
            artist_name: name.into(),
            tags: Vec::new(),
            note: None,
            created_at: chrono::Utc::now(),
            image_url: None,
            genres: Vec::new(),
        }
    }

    #[test]
    fn typing_emits_the_whole_query() {
        let mut screen = SearchScreen::new();
        assert!(screen.captures_input());
        press(&mut screen, KeyCode::Char('a'));
        let action = press(&mut screen, KeyCode::Char('b'));
        assert!(matches!(action, Some(Action::SearchInput(ref q)) if q == "ab"));

        let action = press(&mut screen, KeyCode::Backspace);
        assert!(matches!(action, Some(Action::SearchInput(ref q)) if q == "a"));
    }

    #[test]
    fn cursor_moves_do_not_search() {
        let mut screen = SearchScreen::new();
        press(&mut screen, KeyCode::Char('a'));
        assert!(press(&mut screen, KeyCode::Left).is_none());
        // Backspace at the start of the line changes nothing
        assert!(press(&mut screen, KeyCode::Backspace).is_none());
    }

    #[test]
    fn results_block_and_refuse_duplicates() {
        let mut screen = SearchScreen::new();
        screen
            .update(&Action::SearchUpdated(SearchState {
                query: "al".into(),
                results: Arc::new(vec![result("a1", "Alpha"), result("a2", "Alto")]),
                in_flight: false,
                last_error: None,
            }))
            .unwrap();
        screen
            .update(&Action::BlockedViewUpdated(Arc::new(vec![BlockedArtist {
                artist_id: EntityId::from("a1"),
                name: "Alpha".into(),
                sources: vec![BlockSource::Direct],
            }])))
            .unwrap();
        screen
            .update(&Action::DnpEntriesUpdated(Arc::new(vec![Arc::new(entry("a1", "Alpha"))])))
            .unwrap();

        press(&mut screen, KeyCode::Enter);
        assert!(!screen.captures_input());
        assert_eq!(screen.table.selected(), Some(0));

        assert!(matches!(
            press(&mut screen, KeyCode::Char('b')),
            Some(Action::Notify(_))
        ));
        assert!(matches!(
            press(&mut screen, KeyCode::Char('u')),
            Some(Action::RequestUnblock { .. })
        ));

        press(&mut screen, KeyCode::Char('j'));
        assert!(matches!(
            press(&mut screen, KeyCode::Char('b')),
            Some(Action::RequestBlock { ref name, .. }) if name == "Alto"
        ));

        press(&mut screen, KeyCode::Char('/'));
        assert!(screen.captures_input());
    }
}
