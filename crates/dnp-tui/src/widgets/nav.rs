//! Vim-style list navigation shared by every table screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

/// Move the selection by `delta`, clamped to `0..len`.
pub fn step(state: &mut TableState, len: usize, delta: isize) {
    if len == 0 {
        state.select(None);
        return;
    }
    let current = state.selected().unwrap_or(0);
    let next = current.saturating_add_signed(delta).min(len - 1);
    state.select(Some(next));
}

/// Keep the selection valid after the underlying list changed.
pub fn clamp(state: &mut TableState, len: usize) {
    match (state.selected(), len) {
        (_, 0) => state.select(None),
        (None, _) => state.select(Some(0)),
        (Some(i), _) if i >= len => state.select(Some(len - 1)),
        _ => {}
    }
}

/// Apply j/k, arrows, g/G and Ctrl+d/u. Returns true if the key was a
/// navigation key.
pub fn handle_key(key: KeyEvent, state: &mut TableState, len: usize) -> bool {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => step(state, len, 1),
        KeyCode::Char('k') | KeyCode::Up => step(state, len, -1),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            step(state, len, 10);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            step(state, len, -10);
        }
        KeyCode::Char('g') | KeyCode::Home => step(state, len, isize::MIN),
        KeyCode::Char('G') | KeyCode::End => step(state, len, isize::MAX),
        _ => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn step_clamps_at_both_ends() {
        let mut state = TableState::default();
        step(&mut state, 3, 5);
        assert_eq!(state.selected(), Some(2));
        step(&mut state, 3, -10);
        assert_eq!(state.selected(), Some(0));
        step(&mut state, 0, 1);
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn clamp_follows_shrinking_lists() {
        let mut state = TableState::default().with_selected(Some(7));
        clamp(&mut state, 4);
        assert_eq!(state.selected(), Some(3));
        clamp(&mut state, 0);
        assert_eq!(state.selected(), None);
        clamp(&mut state, 2);
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn ctrl_u_pages_instead_of_unblocking() {
        let mut state = TableState::default().with_selected(Some(15));
        let key = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert!(handle_key(key, &mut state, 20));
        assert_eq!(state.selected(), Some(5));
        let plain = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::NONE);
        assert!(!handle_key(plain, &mut state, 20));
    }
}
