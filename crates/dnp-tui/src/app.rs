//! Application core -- event loop, screen management, action dispatch.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use dnp_core::{
    Command, CommandResult, Controller, EnforcementOperation, ReportFormat, ReportRequest,
};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::enforcement;

/// How long a toast stays on screen.
const TOAST_TTL: Duration = Duration::from_secs(4);
/// Toasts stacked at once; older ones wait in the queue.
const TOAST_VISIBLE: usize = 3;

/// Backend connection as seen by the status bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected(String),
}

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    connection_status: ConnectionStatus,
    help_visible: bool,
    /// Components dispatch follow-up actions through this.
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    controller: Controller,
    /// Cancels the data bridge task.
    data_cancel: CancellationToken,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    /// Toasts, oldest first, stamped when they first became visible.
    notifications: VecDeque<(Notification, Option<Instant>)>,
    enforcement: Arc<Vec<EnforcementOperation>>,
    throbber: ThrobberState,
    /// Stale offense listings (from a previous filter) are dropped.
    offenses_generation: Arc<AtomicU64>,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens().into_iter().collect();

        let active_screen = ScreenId::default();
        if let Some(screen) = screens.get_mut(&active_screen) {
            screen.set_focused(true);
        }

        Self {
            active_screen,
            screens,
            running: true,
            connection_status: ConnectionStatus::default(),
            help_visible: false,
            action_tx,
            action_rx,
            controller,
            data_cancel: CancellationToken::new(),
            pending_confirm: None,
            notifications: VecDeque::new(),
            enforcement: Arc::new(Vec::new()),
            throbber: ThrobberState::default(),
            offenses_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let controller = self.controller.clone();
        let cancel = self.data_cancel.clone();
        let tx = self.action_tx.clone();
        let bridge = tokio::spawn(async move {
            crate::data_bridge::spawn_data_bridge(controller, tx, cancel).await;
        });

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        // Let the bridge disconnect the controller before the runtime stops
        self.data_cancel.cancel();
        let _ = tokio::time::timeout(Duration::from_secs(2), bridge).await;
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// everything else goes to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        // Confirmation dialog captures all input
        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        let Some(screen) = self.screens.get_mut(&self.active_screen) else {
            return Ok(None);
        };
        if screen.captures_input() {
            return screen.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = c.to_digit(10).and_then(|d| usize::try_from(d).ok());
                if let Some(target) = n.and_then(ScreenId::from_number) {
                    return Ok(Some(Action::SwitchScreen(target)));
                }
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.next())));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(self.active_screen.prev())));
            }
            _ => {}
        }

        screen.handle_key_event(key)
    }

    /// Process a single action -- update app state and propagate to screens.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::SwitchScreen(target) => self.switch_to(*target)?,

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Connecting => self.connection_status = ConnectionStatus::Connecting,
            Action::Connected => self.connection_status = ConnectionStatus::Connected,
            Action::Disconnected(reason) => {
                self.connection_status = ConnectionStatus::Disconnected(reason.clone());
            }

            // Ratatui re-lays out from the frame area on every draw
            Action::Resize(..) | Action::Render => {}

            Action::Tick => {
                self.expire_notifications(Instant::now());
                if self.enforcement.iter().any(|op| !op.is_complete()) {
                    self.throbber.calc_next();
                }
            }

            Action::EnforcementUpdated(ops) => self.enforcement = Arc::clone(ops),

            // Data updates go to ALL screens so they stay in sync
            Action::DnpEntriesUpdated(_)
            | Action::BlockedViewUpdated(_)
            | Action::CategoriesUpdated(_)
            | Action::ExceptionsUpdated(..)
            | Action::ConnectionsUpdated(_)
            | Action::SyncStatusesUpdated(_)
            | Action::SyncRunsUpdated(_)
            | Action::DashboardUpdated(_)
            | Action::SearchUpdated(_)
            | Action::CategoryMembersLoaded(..)
            | Action::OffensesLoaded(_)
            | Action::OffenseLoaded(_)
            | Action::ArtistLoaded(_)
            | Action::TrendsLoaded(..) => {
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            // ── Search and ad-hoc loads ───────────────────────────────
            Action::SearchInput(query) => self.controller.search().input(query),

            Action::LoadCategoryMembers(id) => {
                let id = id.clone();
                self.spawn_load("category artists", move |c| async move {
                    let members = c.list_category_members(&id).await?;
                    Ok(Action::CategoryMembersLoaded(id, Arc::new(members)))
                });
            }
            Action::LoadOffenses(filter) => self.load_offenses(filter.clone()),
            Action::LoadOffense(id) => {
                let id = id.clone();
                self.spawn_load("offense", move |c| async move {
                    let offense = c.get_offense(&id).await?;
                    Ok(Action::OffenseLoaded(Box::new(offense)))
                });
            }
            Action::LoadArtist(id) => {
                let id = id.clone();
                self.spawn_load("artist", move |c| async move {
                    let artist = c.get_artist(&id).await?;
                    Ok(Action::ArtistLoaded(Box::new(artist)))
                });
            }
            Action::LoadTrends(days) => {
                let days = *days;
                self.spawn_load("trends", move |c| async move {
                    let points = c.get_trends(days).await?;
                    Ok(Action::TrendsLoaded(days, Arc::new(points)))
                });
            }
            Action::ShowArtistOffenses { .. } => {
                // The screen sets its filter first, so the switch does not
                // trigger an unfiltered load.
                if let Some(screen) = self.screens.get_mut(&ScreenId::Offenses) {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
                self.switch_to(ScreenId::Offenses)?;
            }
            Action::RefreshAll => {
                let controller = self.controller.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let n = match controller.full_refresh().await {
                        Ok(()) => Notification::success("Refreshed"),
                        Err(e) => Notification::error(format!("Refresh failed: {e}")),
                    };
                    let _ = tx.send(Action::Notify(n));
                });
            }

            // ── Command pipeline ──────────────────────────────────────

            // Reversible or additive commands run immediately
            Action::RequestBlock { artist_id, name } => self.execute_command(
                Command::BlockArtist {
                    artist_id: artist_id.clone(),
                    artist_name: name.clone(),
                    tags: Vec::new(),
                    note: None,
                },
                format!("Added {name} to your DNP list"),
            ),
            Action::RequestSubscribe { id, name } => self.execute_command(
                Command::SubscribeCategory { id: id.clone() },
                format!("Subscribed to {name}"),
            ),
            Action::RequestExcept { artist_id, name } => self.execute_command(
                Command::ExceptArtist {
                    artist_id: artist_id.clone(),
                },
                format!("{name} stays playable"),
            ),
            Action::RequestReblock { artist_id, name } => self.execute_command(
                Command::ReblockArtist {
                    artist_id: artist_id.clone(),
                },
                format!("{name} is blocked again"),
            ),
            Action::RequestSync { full } => self.execute_command(
                Command::TriggerSync {
                    platforms: Vec::new(),
                    full: *full,
                },
                if *full {
                    "Full sync started".into()
                } else {
                    "Sync started".into()
                },
            ),
            Action::RequestReport(report_type) => self.generate_report(ReportRequest {
                report_type: *report_type,
                format: ReportFormat::Pdf,
                days: None,
            }),

            // Destructive commands go through the confirmation dialog
            Action::RequestUnblock { artist_id, name } => {
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::Unblock {
                        artist_id: artist_id.clone(),
                        name: name.clone(),
                    }))?;
            }
            Action::RequestUnsubscribe { id, name } => {
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::Unsubscribe {
                        id: id.clone(),
                        name: name.clone(),
                    }))?;
            }
            Action::RequestCancelSync(run_id) => {
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::CancelSync {
                        run_id: run_id.clone(),
                    }))?;
            }
            Action::RequestDisconnect(platform) => {
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::Disconnect {
                        platform: platform.clone(),
                    }))?;
            }

            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm);
                }
            }
            Action::ConfirmNo => self.pending_confirm = None,

            Action::Notify(n) => {
                match n.level {
                    NotificationLevel::Error => warn!(message = %n.message, "notification"),
                    _ => debug!(message = %n.message, "notification"),
                }
                self.notifications.push_back((n.clone(), None));
            }
        }

        Ok(())
    }

    fn switch_to(&mut self, target: ScreenId) -> Result<()> {
        if target == self.active_screen {
            return Ok(());
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&target) {
            screen.set_focused(true);
            // Screens load their data lazily on first visit
            if let Some(follow_up) = screen.update(&Action::SwitchScreen(target))? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Stamp newly visible toasts and drop the ones past their TTL.
    fn expire_notifications(&mut self, now: Instant) {
        while self
            .notifications
            .front()
            .and_then(|(_, shown)| *shown)
            .is_some_and(|shown| now.duration_since(shown) > TOAST_TTL)
        {
            self.notifications.pop_front();
        }
        for (_, shown) in self.notifications.iter_mut().take(TOAST_VISIBLE) {
            shown.get_or_insert(now);
        }
    }

    // ── Command execution ─────────────────────────────────────────

    /// Spawn a command execution task. Sends a Notify action on completion.
    fn execute_command(&self, cmd: Command, success_msg: String) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match controller.execute(cmd).await {
                Ok(_) => {
                    let _ = tx.send(Action::Notify(Notification::success(success_msg)));
                }
                Err(e) => {
                    warn!(error = %e, "command execution failed");
                    let _ = tx.send(Action::Notify(Notification::error(format!("{e}"))));
                }
            }
        });
    }

    /// Map a confirmed action to its Command and execute it.
    fn execute_confirm(&self, action: ConfirmAction) {
        match action {
            ConfirmAction::Unblock { artist_id, name } => self.execute_command(
                Command::UnblockArtist { artist_id },
                format!("Removed {name} from your DNP list"),
            ),
            ConfirmAction::Unsubscribe { id, name } => self.execute_command(
                Command::UnsubscribeCategory { id },
                format!("Unsubscribed from {name}"),
            ),
            ConfirmAction::Disconnect { platform } => {
                let msg = format!("Disconnected {}", platform.display_name());
                self.execute_command(Command::DisconnectPlatform { platform }, msg);
            }
            ConfirmAction::CancelSync { run_id } => self.execute_command(
                Command::CancelSync { run_id },
                "Sync cancelled".into(),
            ),
        }
    }

    fn generate_report(&self, request: ReportRequest) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let n = match controller.execute(Command::GenerateReport(request)).await {
                Ok(CommandResult::Report(report)) => match report.download_url {
                    Some(url) => Notification::success(format!("Report ready: {url}")),
                    None => Notification::info(format!(
                        "Report {} is {}; fetch it with `dnp analytics report-status {}`",
                        report.id, report.status, report.id
                    )),
                },
                Ok(_) => Notification::success("Report requested"),
                Err(e) => {
                    warn!(error = %e, "report generation failed");
                    Notification::error(format!("{e}"))
                }
            };
            let _ = tx.send(Action::Notify(n));
        });
    }

    /// Run a controller read in the background; its action (or an error
    /// toast) comes back through the action channel.
    fn spawn_load<F, Fut>(&self, what: &'static str, load: F)
    where
        F: FnOnce(Controller) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Action, dnp_core::CoreError>> + Send + 'static,
    {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let action = match load(controller).await {
                Ok(action) => action,
                Err(e) => {
                    warn!(error = %e, what, "load failed");
                    Action::Notify(Notification::error(format!("Loading {what} failed: {e}")))
                }
            };
            let _ = tx.send(action);
        });
    }

    fn load_offenses(&self, filter: dnp_core::OffenseFilter) {
        let generation = self.offenses_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let current = Arc::clone(&self.offenses_generation);
        self.spawn_load("offenses", move |c| async move {
            let offenses = c.list_offenses(&filter).await?;
            if current.load(Ordering::Relaxed) != generation {
                // A newer filter was requested meanwhile
                return Ok(Action::Render);
            }
            Ok(Action::OffensesLoaded(Arc::new(offenses)))
        });
    }

    // ── Rendering ─────────────────────────────────────────────────

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays, last = topmost
        if !self.enforcement.is_empty() {
            self.render_enforcement(frame, layout[0]);
        }
        self.render_notifications(frame, area);
        if let Some(ref confirm) = self.pending_confirm {
            render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = ScreenId::ALL
            .iter()
            .map(|&id| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::ALL
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let connection = match &self.connection_status {
            ConnectionStatus::Connected => {
                Span::styled("● connected", Style::default().fg(theme::GREEN))
            }
            ConnectionStatus::Connecting => {
                Span::styled("◐ connecting", Style::default().fg(theme::YELLOW))
            }
            ConnectionStatus::Disconnected(reason) => Span::styled(
                format!("○ disconnected: {reason}"),
                Style::default().fg(theme::RED),
            ),
        };

        let mut spans = vec![Span::raw(" "), connection];
        let active = self.enforcement.iter().filter(|op| !op.is_complete()).count();
        if active > 0 {
            let spinner = Throbber::default()
                .throbber_style(Style::default().fg(theme::ACCENT))
                .to_symbol_span(&self.throbber);
            spans.push(Span::styled(" │ ", theme::key_hint()));
            spans.push(spinner);
            spans.push(Span::styled(
                format!("enforcing {active}"),
                Style::default().fg(theme::ACCENT),
            ));
        }
        spans.push(Span::styled(
            " │ ? help  Tab next  1-6 screens  q quit",
            theme::key_hint(),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Enforcement progress, pinned to the top-right of the content area.
    fn render_enforcement(&self, frame: &mut Frame, area: Rect) {
        let width = 46u16.min(area.width.saturating_sub(2));
        let height =
            enforcement::panel_height(&self.enforcement).min(area.height.saturating_sub(2));
        let x = area.x + area.width.saturating_sub(width + 1);
        let panel = Rect::new(x, area.y + 1, width, height);
        frame.render_widget(Clear, panel);
        enforcement::render(frame, panel, &self.enforcement, &self.throbber);
    }

    /// Stack the visible toasts in the bottom-right corner, newest lowest.
    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        let mut bottom = area.height.saturating_sub(2); // above the bars
        for (notif, _) in self.notifications.iter().take(TOAST_VISIBLE).rev() {
            let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
            let width = msg_len.saturating_add(6).clamp(20, 70).min(area.width);
            let height = 3u16;
            if bottom < height {
                break;
            }
            let y = bottom - height;
            let x = area.width.saturating_sub(width + 1);
            let toast_area = Rect::new(area.x + x, area.y + y, width, height);
            render_notification(frame, toast_area, notif);
            bottom = y;
        }
    }
}

/// Centre a `width` x `height` box inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

fn render_notification(frame: &mut Frame, toast_area: Rect, notif: &Notification) {
    let (color, icon) = match notif.level {
        NotificationLevel::Success => (theme::GREEN, "✓"),
        NotificationLevel::Error => (theme::RED, "✗"),
        NotificationLevel::Warning => (theme::YELLOW, "!"),
        NotificationLevel::Info => (theme::CYAN, "·"),
    };

    frame.render_widget(Clear, toast_area);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        toast_area,
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(notif.message.as_str(), Style::default().fg(theme::TEXT)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
    let text = confirm.to_string();
    let width = u16::try_from(text.chars().count() + 6)
        .unwrap_or(u16::MAX)
        .clamp(40, 72);
    let dialog_area = centered(area, width, 5);

    frame.render_widget(Clear, dialog_area);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        dialog_area,
    );
    let block = Block::default()
        .title(" Confirm ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::YELLOW));
    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let lines = vec![
        Line::from(Span::styled(format!("  {text}"), Style::default().fg(theme::TEXT))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("confirm    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = centered(
        area,
        62u16.min(area.width.saturating_sub(4)),
        24u16.min(area.height.saturating_sub(4)),
    );
    frame.render_widget(Clear, help_area);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        help_area,
    );
    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(theme::CYAN),
        ))
    };
    let key = |k: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {k:<10}"), theme::key_hint_key()),
            Span::styled(desc, theme::key_hint()),
        ])
    };

    let help_text = vec![
        Line::from(""),
        section("Navigation"),
        key("1-6", "Jump to screen"),
        key("Tab", "Next screen"),
        key("j/k ↑/↓", "Move up/down"),
        key("g/G", "Top / bottom"),
        key("Ctrl+d/u", "Page down / up"),
        key("h/l", "Switch view or pane"),
        Line::from(""),
        section("Blocking"),
        key("b", "Block artist (search)"),
        key("u", "Unblock artist"),
        key("x / r", "Except / reblock a category artist"),
        key("Space", "Subscribe / unsubscribe category"),
        key("s / S", "Sync / full sync (platforms)"),
        Line::from(""),
        section("Global"),
        key("?", "This help"),
        key("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  Esc or ? to close", theme::key_hint())),
    ];
    frame.render_widget(Paragraph::new(help_text), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    use dnp_core::{AuthCredentials, ControllerConfig, EntityId};

    use super::*;

    fn app() -> App {
        let config = ControllerConfig::new(
            "https://dnp.example.com".parse().unwrap(),
            AuthCredentials::Token("t".to_owned().into()),
        );
        App::new(Controller::new(config))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn drain(app: &mut App) -> Vec<Action> {
        std::iter::from_fn(|| app.action_rx.try_recv().ok()).collect()
    }

    #[test]
    fn number_keys_switch_screens() {
        let mut app = app();
        let action = app.handle_key_event(key(KeyCode::Char('3'))).unwrap();
        assert!(matches!(action, Some(Action::SwitchScreen(ScreenId::Categories))));
    }

    #[test]
    fn text_entry_suspends_global_keys() {
        let mut app = app();
        app.process_action(&Action::SwitchScreen(ScreenId::Search))
            .unwrap();
        assert_eq!(app.active_screen, ScreenId::Search);

        let action = app.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert!(matches!(action, Some(Action::SearchInput(ref q)) if q == "q"));

        // Ctrl+C always quits
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(
            app.handle_key_event(ctrl_c).unwrap(),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn unblock_waits_for_confirmation() {
        let mut app = app();
        app.process_action(&Action::RequestUnblock {
            artist_id: EntityId::from("a1"),
            name: "Alpha".into(),
        })
        .unwrap();
        let queued = drain(&mut app);
        assert_eq!(queued.len(), 1);
        app.process_action(&queued[0]).unwrap();
        assert!(app.pending_confirm.is_some());

        // The dialog swallows unrelated keys
        assert!(app.handle_key_event(key(KeyCode::Char('2'))).unwrap().is_none());
        let action = app.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(matches!(action, Some(Action::ConfirmNo)));
        app.process_action(&Action::ConfirmNo).unwrap();
        assert!(app.pending_confirm.is_none());
    }

    #[test]
    fn first_visit_to_analytics_loads_trends() {
        let mut app = app();
        app.switch_to(ScreenId::Analytics).unwrap();
        let queued = drain(&mut app);
        assert!(matches!(queued.as_slice(), [Action::LoadTrends(30)]));
    }

    #[test]
    fn toasts_expire_after_their_ttl() {
        let mut app = app();
        for i in 0..4 {
            app.process_action(&Action::Notify(Notification::info(format!("n{i}"))))
                .unwrap();
        }
        let t0 = Instant::now();
        app.expire_notifications(t0);
        let stamped = app.notifications.iter().filter(|(_, s)| s.is_some()).count();
        assert_eq!(stamped, TOAST_VISIBLE);

        app.expire_notifications(t0 + TOAST_TTL + Duration::from_millis(1));
        assert_eq!(app.notifications.len(), 1);
        assert_eq!(app.notifications[0].0.message, "n3");
    }

    #[test]
    fn renders_tab_bar_and_status() {
        let app = app();
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect();
        assert!(text.contains("1 Blocklist"));
        assert!(text.contains("6 Analytics"));
        assert!(text.contains("connecting"));
    }
}
