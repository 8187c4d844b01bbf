//! Platforms screen -- linked streaming accounts, per-platform sync
//! status and recent sync runs.

use std::collections::HashMap;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use dnp_core::{Platform, PlatformConnection, PlatformSyncStatus, SyncRun};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::{nav, sub_tabs, time_fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Connections,
    Runs,
}

pub struct PlatformsScreen {
    focused: bool,
    pane: Pane,
    connections: Arc<Vec<Arc<PlatformConnection>>>,
    sync_statuses: HashMap<Platform, Arc<PlatformSyncStatus>>,
    runs: Arc<Vec<Arc<SyncRun>>>,
    connection_table: TableState,
    run_table: TableState,
}

impl PlatformsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            pane: Pane::Connections,
            connections: Arc::new(Vec::new()),
            sync_statuses: HashMap::new(),
            runs: Arc::new(Vec::new()),
            connection_table: TableState::default(),
            run_table: TableState::default(),
        }
    }

    fn selected_connection(&self) -> Option<&Arc<PlatformConnection>> {
        self.connection_table
            .selected()
            .and_then(|i| self.connections.get(i))
    }

    fn selected_run(&self) -> Option<&Arc<SyncRun>> {
        self.run_table.selected().and_then(|i| self.runs.get(i))
    }

    fn pane_block(&self, title: String, pane: Pane) -> Block<'static> {
        Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused && self.pane == pane {
                theme::border_focused()
            } else {
                theme::border_default()
            })
    }

    fn render_connections(&self, frame: &mut Frame, area: Rect) {
        let active = self.connections.iter().filter(|c| c.status.is_active()).count();
        let block = self.pane_block(
            format!(" Connections ({active}/{} active) ", self.connections.len()),
            Pane::Connections,
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.connections.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  No streaming accounts linked. Connect one from the web app.",
                    theme::key_hint(),
                )),
                inner,
            );
            return;
        }

        let header = Row::new(vec![
            Cell::from("Platform"),
            Cell::from("Account"),
            Cell::from("Status"),
            Cell::from("Last sync"),
            Cell::from("Blocked"),
            Cell::from("Health check"),
        ])
        .style(theme::table_header());

        let rows: Vec<Row> = self
            .connections
            .iter()
            .map(|c| {
                let sync = self.sync_statuses.get(&c.platform);
                let status = match c.error_message {
                    Some(ref err) => format!("{} ({err})", c.status),
                    None => c.status.to_string(),
                };
                Row::new(vec![
                    Cell::from(c.platform.display_name().to_owned()),
                    Cell::from(c.display_name.clone().unwrap_or_default()),
                    Cell::from(status)
                        .style(Style::default().fg(theme::connection_color(&c.status))),
                    Cell::from(match sync {
                        Some(s) => Span::styled(
                            format!("{} {}", s.status, time_fmt::ago(s.last_sync_at)),
                            Style::default().fg(theme::sync_status_color(s.status)),
                        ),
                        None => Span::styled("never", theme::key_hint()),
                    }),
                    Cell::from(sync.map_or_else(String::new, |s| s.artists_blocked.to_string())),
                    Cell::from(time_fmt::ago(c.last_health_check)).style(theme::key_hint()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(14),
            Constraint::Min(14),
            Constraint::Length(20),
            Constraint::Length(24),
            Constraint::Length(8),
            Constraint::Length(14),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(if self.pane == Pane::Connections {
                theme::table_selected()
            } else {
                Style::default()
            });
        frame.render_stateful_widget(table, inner, &mut self.connection_table.clone());
    }

    fn render_runs(&self, frame: &mut Frame, area: Rect) {
        let block = self.pane_block(format!(" Sync runs ({}) ", self.runs.len()), Pane::Runs);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Row::new(vec![
            Cell::from("Platform"),
            Cell::from("Type"),
            Cell::from("Status"),
            Cell::from("Processed"),
            Cell::from("Blocked"),
            Cell::from("Errors"),
            Cell::from("Started"),
        ])
        .style(theme::table_header());

        let rows: Vec<Row> = self
            .runs
            .iter()
            .map(|r| {
                let errors = if r.error_count > 0 {
                    Span::styled(r.error_count.to_string(), Style::default().fg(theme::RED))
                } else {
                    Span::raw("0")
                };
                Row::new(vec![
                    Cell::from(r.platform.display_name().to_owned()),
                    Cell::from(r.sync_type.to_string()),
                    Cell::from(r.status.to_string())
                        .style(Style::default().fg(theme::sync_status_color(r.status))),
                    Cell::from(r.artists_processed.to_string()),
                    Cell::from(r.artists_blocked.to_string()),
                    Cell::from(errors),
                    Cell::from(time_fmt::ago(r.started_at)).style(theme::key_hint()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(14),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Min(10),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(if self.pane == Pane::Runs {
                theme::table_selected()
            } else {
                Style::default()
            });
        frame.render_stateful_widget(table, inner, &mut self.run_table.clone());
    }
}

impl Component for PlatformsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let handled = match self.pane {
            Pane::Connections => {
                nav::handle_key(key, &mut self.connection_table, self.connections.len())
            }
            Pane::Runs => nav::handle_key(key, &mut self.run_table, self.runs.len()),
        };
        if handled {
            return Ok(None);
        }

        Ok(match key.code {
            KeyCode::Char('h' | 'l') | KeyCode::Left | KeyCode::Right => {
                self.pane = match self.pane {
                    Pane::Connections => Pane::Runs,
                    Pane::Runs => Pane::Connections,
                };
                None
            }
            KeyCode::Char('s') => Some(Action::RequestSync { full: false }),
            KeyCode::Char('S') => Some(Action::RequestSync { full: true }),
            KeyCode::Char('r') => Some(Action::RefreshAll),
            KeyCode::Char('d') if self.pane == Pane::Connections => self
                .selected_connection()
                .map(|c| Action::RequestDisconnect(c.platform.clone())),
            KeyCode::Char('c') if self.pane == Pane::Runs => {
                self.selected_run().map(|run| {
                    if run.status.is_active() {
                        Action::RequestCancelSync(run.id.clone())
                    } else {
                        Action::Notify(Notification::info(format!("Sync run is {}", run.status)))
                    }
                })
            }
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::ConnectionsUpdated(connections) => {
                self.connections = Arc::clone(connections);
                nav::clamp(&mut self.connection_table, self.connections.len());
            }
            Action::SyncStatusesUpdated(statuses) => {
                self.sync_statuses = statuses
                    .iter()
                    .map(|s| (s.platform.clone(), Arc::clone(s)))
                    .collect();
            }
            Action::SyncRunsUpdated(runs) => {
                self.runs = Arc::clone(runs);
                nav::clamp(&mut self.run_table, self.runs.len());
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Percentage(45),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

        self.render_connections(frame, layout[0]);
        self.render_runs(frame, layout[1]);

        let hints = match self.pane {
            Pane::Connections => sub_tabs::render_hints(&[
                ("j/k", "navigate"),
                ("h/l", "pane"),
                ("s/S", "sync/full sync"),
                ("d", "disconnect"),
                ("r", "refresh"),
            ]),
            Pane::Runs => sub_tabs::render_hints(&[
                ("j/k", "navigate"),
                ("h/l", "pane"),
                ("s/S", "sync/full sync"),
                ("c", "cancel run"),
                ("r", "refresh"),
            ]),
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

    use dnp_core::{ConnectionStatus, EntityId, SyncStatus, SyncType};

    use super::*;

    fn press(screen: &mut PlatformsScreen, c: char) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
            .unwrap()
    }

    fn run(id: &str, status: SyncStatus) -> Arc<SyncRun> {
        Arc::new(SyncRun {
            id: EntityId::from(id),
            platform: Platform::Spotify,
            sync_type: SyncType::Incremental,
            status,
            artists_processed: 10,
            artists_blocked: 2,
            error_count: 0,
            started_at: None,
            completed_at: None,
            error_message: None,
        })
    }

    #[test]
    fn disconnect_targets_the_selected_connection() {
        let mut screen = PlatformsScreen::new();
        screen
            .update(&Action::ConnectionsUpdated(Arc::new(vec![Arc::new(
                PlatformConnection {
                    platform: Platform::Tidal,
                    status: ConnectionStatus::Active,
                    display_name: Some("me".into()),
                    connected_at: None,
                    last_health_check: None,
                    error_message: None,
                },
            )])))
            .unwrap();
        assert!(matches!(
            press(&mut screen, 'd'),
            Some(Action::RequestDisconnect(Platform::Tidal))
        ));
        assert!(matches!(
            press(&mut screen, 'S'),
            Some(Action::RequestSync { full: true })
        ));
    }

    #[test]
    fn only_active_runs_can_be_cancelled() {
        let mut screen = PlatformsScreen::new();
        screen
            .update(&Action::SyncRunsUpdated(Arc::new(vec![
                run("r1", SyncStatus::Running),
                run("r2", SyncStatus::Completed),
            ])))
            .unwrap();
        press(&mut screen, 'l');

        assert!(matches!(
            press(&mut screen, 'c'),
            Some(Action::RequestCancelSync(ref id)) if id.to_string() == "r1"
        ));
        press(&mut screen, 'j');
        assert!(matches!(press(&mut screen, 'c'), Some(Action::Notify(_))));
    }
}
