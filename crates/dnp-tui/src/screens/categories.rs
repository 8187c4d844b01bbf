//! Categories screen -- subscribe to curated offense categories and
//! manage per-artist exceptions within them.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use dnp_core::{Category, CategoryMember, EntityId};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{nav, sub_tabs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Categories,
    Members,
}

pub struct CategoriesScreen {
    focused: bool,
    pane: Pane,
    categories: Arc<Vec<Arc<Category>>>,
    members: HashMap<EntityId, Arc<Vec<CategoryMember>>>,
    /// Categories with a member request in flight.
    loading: HashSet<EntityId>,
    exceptions: Arc<HashSet<EntityId>>,
    category_table: TableState,
    member_table: TableState,
}

impl CategoriesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            pane: Pane::Categories,
            categories: Arc::new(Vec::new()),
            members: HashMap::new(),
            loading: HashSet::new(),
            exceptions: Arc::new(HashSet::new()),
            category_table: TableState::default(),
            member_table: TableState::default(),
        }
    }

    fn selected_category(&self) -> Option<&Arc<Category>> {
        self.category_table
            .selected()
            .and_then(|i| self.categories.get(i))
    }

    fn selected_members(&self) -> Option<&Arc<Vec<CategoryMember>>> {
        self.selected_category()
            .and_then(|c| self.members.get(&c.id))
    }

    fn selected_member(&self) -> Option<&CategoryMember> {
        let i = self.member_table.selected()?;
        self.selected_members()?.get(i)
    }

    /// Ask for the selected category's members unless cached or pending.
    fn load_selected(&mut self) -> Option<Action> {
        let id = self.selected_category()?.id.clone();
        if self.members.contains_key(&id) || self.loading.contains(&id) {
            return None;
        }
        self.loading.insert(id.clone());
        Some(Action::LoadCategoryMembers(id))
    }

    fn toggle_subscription(&self) -> Option<Action> {
        let cat = self.selected_category()?;
        let id = cat.id.clone();
        let name = cat.name.clone();
        Some(if cat.subscribed {
            Action::RequestUnsubscribe { id, name }
        } else {
            Action::RequestSubscribe { id, name }
        })
    }

    fn handle_categories_key(&mut self, key: KeyEvent) -> Option<Action> {
        let before = self.category_table.selected();
        if nav::handle_key(key, &mut self.category_table, self.categories.len()) {
            if self.category_table.selected() != before {
                self.member_table.select(Some(0));
                return self.load_selected();
            }
            return None;
        }
        match key.code {
            KeyCode::Char(' ' | 's') => self.toggle_subscription(),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                self.pane = Pane::Members;
                let len = self.selected_members().map_or(0, |m| m.len());
                nav::clamp(&mut self.member_table, len);
                // Enter retries a load that never answered
                if let Some(id) = self.selected_category().map(|c| c.id.clone()) {
                    self.loading.remove(&id);
                }
                self.load_selected()
            }
            _ => None,
        }
    }

    fn handle_members_key(&mut self, key: KeyEvent) -> Option<Action> {
        let len = self.selected_members().map_or(0, |m| m.len());
        if nav::handle_key(key, &mut self.member_table, len) {
            return None;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => {
                self.pane = Pane::Categories;
                None
            }
            KeyCode::Char(' ' | 's') => self.toggle_subscription(),
            KeyCode::Char('x') => {
                let m = self.selected_member()?;
                (!self.exceptions.contains(&m.artist_id)).then(|| Action::RequestExcept {
                    artist_id: m.artist_id.clone(),
                    name: m.name.clone(),
                })
            }
            KeyCode::Char('r') => {
                let m = self.selected_member()?;
                self.exceptions
                    .contains(&m.artist_id)
                    .then(|| Action::RequestReblock {
                        artist_id: m.artist_id.clone(),
                        name: m.name.clone(),
                    })
            }
            KeyCode::Enter => {
                let m = self.selected_member()?;
                Some(Action::ShowArtistOffenses {
                    artist_id: m.artist_id.clone(),
                    name: m.name.clone(),
                })
            }
            _ => None,
        }
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

    fn render_categories(&self, frame: &mut Frame, area: Rect) {
        let subscribed = self.categories.iter().filter(|c| c.subscribed).count();
        let block = self.pane_block(
            format!(" Categories ({subscribed}/{} subscribed) ", self.categories.len()),
            Pane::Categories,
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows: Vec<Row> = self
            .categories
            .iter()
            .map(|c| {
                let flag = if c.subscribed {
                    Span::styled("●", Style::default().fg(theme::GREEN))
                } else {
                    Span::styled("○", theme::key_hint())
                };
                Row::new(vec![
                    Cell::from(flag),
                    Cell::from(c.name.clone()),
                    Cell::from(c.artist_count.to_string()).style(theme::key_hint()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [Constraint::Length(1), Constraint::Min(16), Constraint::Length(6)],
        )
        .header(
            Row::new(vec![Cell::from(""), Cell::from("Category"), Cell::from("Artists")])
                .style(theme::table_header()),
        )
        .row_highlight_style(theme::table_selected());
        frame.render_stateful_widget(table, inner, &mut self.category_table.clone());
    }

    fn render_members(&self, frame: &mut Frame, area: Rect) {
        let Some(cat) = self.selected_category() else {
            let block = self.pane_block(" Artists ".into(), Pane::Members);
            frame.render_widget(block, area);
            return;
        };
        let block = self.pane_block(format!(" {} ", cat.name), Pane::Members);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).split(inner);
        let description = cat.description.clone().unwrap_or_default();
        frame.render_widget(
            Paragraph::new(Span::styled(description, theme::key_hint())).wrap(Wrap { trim: true }),
            layout[0],
        );

        let Some(members) = self.members.get(&cat.id) else {
            let msg = if self.loading.contains(&cat.id) {
                "  Loading artists…"
            } else {
                "  Press Enter to load artists."
            };
            frame.render_widget(
                Paragraph::new(Span::styled(msg, theme::key_hint())),
                layout[1],
            );
            return;
        };

        let rows: Vec<Row> = members
            .iter()
            .map(|m| {
                let state = if self.exceptions.contains(&m.artist_id) {
                    Span::styled("excepted", Style::default().fg(theme::GREEN))
                } else if cat.subscribed {
                    Span::styled("blocked", Style::default().fg(theme::YELLOW))
                } else {
                    Span::raw("")
                };
                Row::new(vec![
                    Cell::from(m.name.clone()),
                    Cell::from(m.genres.join(", ")).style(theme::key_hint()),
                    Cell::from(state),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [Constraint::Min(18), Constraint::Percentage(40), Constraint::Length(9)],
        )
        .row_highlight_style(if self.pane == Pane::Members {
            theme::table_selected()
        } else {
            Style::default()
        });
        frame.render_stateful_widget(table, layout[1], &mut self.member_table.clone());
    }
}

impl Component for CategoriesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match self.pane {
            Pane::Categories => self.handle_categories_key(key),
            Pane::Members => self.handle_members_key(key),
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::CategoriesUpdated(categories) => {
                self.categories = Arc::clone(categories);
                let had_selection = self.category_table.selected().is_some();
                nav::clamp(&mut self.category_table, self.categories.len());
                if !had_selection {
                    return Ok(self.load_selected());
                }
            }
            Action::CategoryMembersLoaded(id, members) => {
                self.loading.remove(id);
                self.members.insert(id.clone(), Arc::clone(members));
                if self.selected_category().is_some_and(|c| &c.id == id) {
                    nav::clamp(&mut self.member_table, members.len());
                }
            }
            Action::ExceptionsUpdated(ids, _) => {
                self.exceptions = Arc::clone(ids);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
        let cols = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(layout[0]);

        self.render_categories(frame, cols[0]);
        self.render_members(frame, cols[1]);

        let hints: Line = match self.pane {
            Pane::Categories => sub_tabs::render_hints(&[
                ("j/k", "navigate"),
                ("Space", "subscribe/unsubscribe"),
                ("Enter", "artists"),
            ]),
            Pane::Members => sub_tabs::render_hints(&[
                ("j/k", "navigate"),
                ("x", "except"),
                ("r", "reblock"),
                ("Enter", "offenses"),
                ("Esc", "back"),
            ]),
        };
        frame.render_widget(Paragraph::new(hints), layout[1]);
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

    fn press(screen: &mut CategoriesScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn category(id: &str, name: &str, subscribed: bool) -> Arc<Category> {
        Arc::new(Category {
            id: EntityId::from(id),
            name: name.into(),
            description: None,
            artist_count: 2,
            subscribed,
        })
    }

    fn member(id: &str, name: &str) -> CategoryMember {
        CategoryMember {
            artist_id: EntityId::from(id),
            name: name.into(),
            genres: Vec::new(),
            image_url: None,
        }
    }

    fn loaded_screen() -> CategoriesScreen {
        let mut screen = CategoriesScreen::new();
        screen.set_focused(true);
        let follow_up = screen
            .update(&Action::CategoriesUpdated(Arc::new(vec![
                category("c1", "Violence", true),
                category("c2", "Fraud", false),
            ])))
            .unwrap();
        assert!(matches!(
            follow_up,
            Some(Action::LoadCategoryMembers(ref id)) if id.to_string() == "c1"
        ));
        screen
            .update(&Action::CategoryMembersLoaded(
                EntityId::from("c1"),
                Arc::new(vec![member("a2", "Bravo"), member("a3", "Charlie")]),
            ))
            .unwrap();
        screen
    }

    #[test]
    fn space_toggles_by_subscription_state() {
        let mut screen = loaded_screen();
        assert!(matches!(
            press(&mut screen, KeyCode::Char(' ')),
            Some(Action::RequestUnsubscribe { ref name, .. }) if name == "Violence"
        ));

        // Moving onto an uncached category requests its members once
        assert!(matches!(
            press(&mut screen, KeyCode::Char('j')),
            Some(Action::LoadCategoryMembers(_))
        ));
        assert!(matches!(
            press(&mut screen, KeyCode::Char(' ')),
            Some(Action::RequestSubscribe { ref name, .. }) if name == "Fraud"
        ));
        // Enter retries the still-unanswered load
        assert!(matches!(
            press(&mut screen, KeyCode::Enter),
            Some(Action::LoadCategoryMembers(_))
        ));
    }

    #[test]
    fn members_pane_excepts_and_reblocks() {
        let mut screen = loaded_screen();
        assert!(press(&mut screen, KeyCode::Enter).is_none());
        assert_eq!(screen.pane, Pane::Members);

        assert!(matches!(
            press(&mut screen, KeyCode::Char('x')),
            Some(Action::RequestExcept { ref name, .. }) if name == "Bravo"
        ));
        // Not excepted yet, nothing to reblock
        assert!(press(&mut screen, KeyCode::Char('r')).is_none());

        let ids: HashSet<EntityId> = [EntityId::from("a2")].into_iter().collect();
        screen
            .update(&Action::ExceptionsUpdated(Arc::new(ids), Arc::new(Vec::new())))
            .unwrap();
        assert!(press(&mut screen, KeyCode::Char('x')).is_none());
        assert!(matches!(
            press(&mut screen, KeyCode::Char('r')),
            Some(Action::RequestReblock { .. })
        ));

        press(&mut screen, KeyCode::Esc);
        assert_eq!(screen.pane, Pane::Categories);
    }
}
