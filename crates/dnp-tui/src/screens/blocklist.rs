//! Blocklist screen -- the effective blocklist, the direct DNP entries
//! and the category exceptions, as three sub-tabs.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use dnp_core::{BlockedArtist, DnpEntry};

use crate::action::{Action, ExceptedArtist, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::{nav, sub_tabs, time_fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SubTab {
    #[default]
    Effective,
    Direct,
    Exceptions,
}

impl SubTab {
    const LABELS: [&'static str; 3] = ["Effective", "Direct", "Exceptions"];

    fn index(self) -> usize {
        match self {
            Self::Effective => 0,
            Self::Direct => 1,
            Self::Exceptions => 2,
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Effective => Self::Direct,
            Self::Direct => Self::Exceptions,
            Self::Exceptions => Self::Effective,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Effective => Self::Exceptions,
            Self::Direct => Self::Effective,
            Self::Exceptions => Self::Direct,
        }
    }
}

pub struct BlocklistScreen {
    focused: bool,
    sub_tab: SubTab,
    blocked: Arc<Vec<BlockedArtist>>,
    entries: Arc<Vec<Arc<DnpEntry>>>,
    excepted: Arc<Vec<ExceptedArtist>>,
    effective_table: TableState,
    direct_table: TableState,
    exceptions_table: TableState,
}

impl BlocklistScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            sub_tab: SubTab::default(),
            blocked: Arc::new(Vec::new()),
            entries: Arc::new(Vec::new()),
            excepted: Arc::new(Vec::new()),
            effective_table: TableState::default(),
            direct_table: TableState::default(),
            exceptions_table: TableState::default(),
        }
    }

    fn active_len(&self) -> usize {
        match self.sub_tab {
            SubTab::Effective => self.blocked.len(),
            SubTab::Direct => self.entries.len(),
            SubTab::Exceptions => self.excepted.len(),
        }
    }

    fn active_table(&mut self) -> &mut TableState {
        match self.sub_tab {
            SubTab::Effective => &mut self.effective_table,
            SubTab::Direct => &mut self.direct_table,
            SubTab::Exceptions => &mut self.exceptions_table,
        }
    }

    fn selected_blocked(&self) -> Option<&BlockedArtist> {
        self.effective_table
            .selected()
            .and_then(|i| self.blocked.get(i))
    }

    fn selected_entry(&self) -> Option<&Arc<DnpEntry>> {
        self.direct_table.selected().and_then(|i| self.entries.get(i))
    }

    fn selected_excepted(&self) -> Option<&ExceptedArtist> {
        self.exceptions_table
            .selected()
            .and_then(|i| self.excepted.get(i))
    }

    fn key_action(&self, code: KeyCode) -> Option<Action> {
        match (self.sub_tab, code) {
            (SubTab::Effective, KeyCode::Char('u')) => {
                let row = self.selected_blocked()?;
                if !row.is_direct() {
                    return Some(Action::Notify(Notification::info(format!(
                        "{} is blocked by a category; press x to except it",
                        row.name
                    ))));
                }
                Some(Action::RequestUnblock {
                    artist_id: row.artist_id.clone(),
                    name: row.name.clone(),
                })
            }
            (SubTab::Effective, KeyCode::Char('x')) => {
                let row = self.selected_blocked()?;
                if row.is_direct() {
                    return Some(Action::Notify(Notification::info(format!(
                        "{} is on your DNP list; press u to unblock it",
                        row.name
                    ))));
                }
                Some(Action::RequestExcept {
                    artist_id: row.artist_id.clone(),
                    name: row.name.clone(),
                })
            }
            (SubTab::Effective, KeyCode::Enter) => {
                let row = self.selected_blocked()?;
                Some(Action::ShowArtistOffenses {
                    artist_id: row.artist_id.clone(),
                    name: row.name.clone(),
                })
            }
            (SubTab::Direct, KeyCode::Char('u')) => {
                let entry = self.selected_entry()?;
                Some(Action::RequestUnblock {
                    artist_id: entry.artist_id.clone(),
                    name: entry.artist_name.clone(),
                })
            }
            (SubTab::Direct, KeyCode::Enter) => {
                let entry = self.selected_entry()?;
                Some(Action::ShowArtistOffenses {
                    artist_id: entry.artist_id.clone(),
                    name: entry.artist_name.clone(),
                })
            }
            (SubTab::Exceptions, KeyCode::Char('r')) => {
                let ex = self.selected_excepted()?;
                Some(Action::RequestReblock {
                    artist_id: ex.artist_id.clone(),
                    name: ex.label(),
                })
            }
            _ => None,
        }
    }

    fn render_effective(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(vec![
            Cell::from("Artist"),
            Cell::from("Blocked by"),
        ])
        .style(theme::table_header());

        let rows: Vec<Row> = self
            .blocked
            .iter()
            .map(|b| {
                let source_style = if b.is_direct() {
                    Style::default().fg(theme::CORAL)
                } else {
                    Style::default().fg(theme::YELLOW)
                };
                Row::new(vec![
                    Cell::from(b.name.clone()),
                    Cell::from(b.source_label()).style(source_style),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(rows, [Constraint::Min(24), Constraint::Percentage(50)])
            .header(header)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸");
        frame.render_stateful_widget(table, area, &mut self.effective_table.clone());
    }

    fn render_direct(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(vec![
            Cell::from("Artist"),
            Cell::from("Tags"),
            Cell::from("Note"),
            Cell::from("Added"),
        ])
        .style(theme::table_header());

        let rows: Vec<Row> = self
            .entries
            .iter()
            .map(|e| {
                Row::new(vec![
                    Cell::from(e.artist_name.clone()),
                    Cell::from(e.tags.join(", ")).style(Style::default().fg(theme::CYAN)),
                    Cell::from(e.note.clone().unwrap_or_default()),
                    Cell::from(time_fmt::ago(Some(e.created_at))).style(theme::key_hint()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Min(20),
            Constraint::Length(20),
            Constraint::Min(16),
            Constraint::Length(12),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸");
        frame.render_stateful_widget(table, area, &mut self.direct_table.clone());
    }

    fn render_exceptions(&self, frame: &mut Frame, area: Rect) {
        if self.excepted.is_empty() {
            let msg = Paragraph::new(Span::styled(
                "  No exceptions. Press x on a category-blocked artist to keep it playable.",
                theme::key_hint(),
            ));
            frame.render_widget(msg, area);
            return;
        }

        let rows: Vec<Row> = self
            .excepted
            .iter()
            .map(|ex| {
                Row::new(vec![
                    Cell::from(ex.label()),
                    Cell::from(ex.artist_id.to_string()).style(theme::key_hint()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(rows, [Constraint::Min(24), Constraint::Length(38)])
            .header(
                Row::new(vec![Cell::from("Artist"), Cell::from("ID")])
                    .style(theme::table_header()),
            )
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸");
        frame.render_stateful_widget(table, area, &mut self.exceptions_table.clone());
    }
}

impl Component for BlocklistScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let len = self.active_len();
        if nav::handle_key(key, self.active_table(), len) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Char('l' | 'f') | KeyCode::Right => {
                self.sub_tab = self.sub_tab.next();
                Ok(None)
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.sub_tab = self.sub_tab.prev();
                Ok(None)
            }
            code => Ok(self.key_action(code)),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::BlockedViewUpdated(view) => {
                self.blocked = Arc::clone(view);
                nav::clamp(&mut self.effective_table, self.blocked.len());
            }
            Action::DnpEntriesUpdated(entries) => {
                let mut sorted: Vec<Arc<DnpEntry>> = entries.iter().cloned().collect();
                sorted.sort_by_key(|e| e.artist_name.to_lowercase());
                self.entries = Arc::new(sorted);
                nav::clamp(&mut self.direct_table, self.entries.len());
            }
            Action::ExceptionsUpdated(_, named) => {
                self.excepted = Arc::clone(named);
                nav::clamp(&mut self.exceptions_table, self.excepted.len());
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Blocklist ({}) ", self.blocked.len()))
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
            Constraint::Length(1), // sub-tabs
            Constraint::Min(1),    // content
            Constraint::Length(1), // hints
        ])
        .split(inner);

        frame.render_widget(
            Paragraph::new(sub_tabs::render_sub_tabs(
                &SubTab::LABELS,
                self.sub_tab.index(),
            )),
            layout[0],
        );

        match self.sub_tab {
            SubTab::Effective => self.render_effective(frame, layout[1]),
            SubTab::Direct => self.render_direct(frame, layout[1]),
            SubTab::Exceptions => self.render_exceptions(frame, layout[1]),
        }

        let hints = match self.sub_tab {
            SubTab::Effective => sub_tabs::render_hints(&[
                ("j/k", "navigate"),
                ("h/l", "view"),
                ("u", "unblock"),
                ("x", "except"),
                ("Enter", "offenses"),
            ]),
            SubTab::Direct => sub_tabs::render_hints(&[
                ("j/k", "navigate"),
                ("h/l", "view"),
                ("u", "unblock"),
                ("Enter", "offenses"),
            ]),
            SubTab::Exceptions => {
                sub_tabs::render_hints(&[("j/k", "navigate"), ("h/l", "view"), ("r", "reblock")])
            }
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

    use dnp_core::{BlockSource, EntityId};

    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn screen_with_rows() -> BlocklistScreen {
        let mut screen = BlocklistScreen::new();
        let view = vec![
            BlockedArtist {
                artist_id: EntityId::from("a1"),
                name: "Alpha".into(),
                sources: vec![BlockSource::Direct],
            },
            BlockedArtist {
                artist_id: EntityId::from("a2"),
                name: "Bravo".into(),
                sources: vec![BlockSource::Category {
                    id: EntityId::from("c1"),
                    name: "Violence".into(),
                }],
            },
        ];
        screen
            .update(&Action::BlockedViewUpdated(Arc::new(view)))
            .unwrap();
        screen
    }

    #[test]
    fn unblock_targets_direct_rows() {
        let mut screen = screen_with_rows();
        let action = screen.handle_key_event(key('u')).unwrap();
        assert!(matches!(
            action,
            Some(Action::RequestUnblock { ref artist_id, .. }) if artist_id.to_string() == "a1"
        ));
    }

    #[test]
    fn category_rows_are_excepted_not_unblocked() {
        let mut screen = screen_with_rows();
        screen.handle_key_event(key('j')).unwrap();

        let action = screen.handle_key_event(key('x')).unwrap();
        assert!(matches!(
            action,
            Some(Action::RequestExcept { ref name, .. }) if name == "Bravo"
        ));
        let action = screen.handle_key_event(key('u')).unwrap();
        assert!(matches!(action, Some(Action::Notify(_))));
    }

    #[test]
    fn exceptions_tab_reblocks() {
        let mut screen = screen_with_rows();
        let excepted = vec![ExceptedArtist {
            artist_id: EntityId::from("a3"),
            name: Some("Charlie".into()),
        }];
        screen
            .update(&Action::ExceptionsUpdated(
                Arc::new([EntityId::from("a3")].into_iter().collect()),
                Arc::new(excepted),
            ))
            .unwrap();
        screen.handle_key_event(key('l')).unwrap();
        screen.handle_key_event(key('l')).unwrap();
        assert_eq!(screen.sub_tab, SubTab::Exceptions);

        let action = screen.handle_key_event(key('r')).unwrap();
        assert!(matches!(
            action,
            Some(Action::RequestReblock { ref name, .. }) if name == "Charlie"
        ));
    }
}
