//! Palette and semantic styles for the TUI.

use ratatui::style::{Color, Modifier, Style};

use dnp_core::{ConnectionStatus, Severity, SyncStatus};

// ── Palette ──────────────────────────────────────────────────────────

pub const ACCENT: Color = Color::Rgb(225, 53, 255);
pub const CYAN: Color = Color::Rgb(128, 255, 234);
pub const CORAL: Color = Color::Rgb(255, 106, 193);
pub const YELLOW: Color = Color::Rgb(241, 250, 140);
pub const GREEN: Color = Color::Rgb(80, 250, 123);
pub const RED: Color = Color::Rgb(255, 99, 99);
pub const TEXT: Color = Color::Rgb(189, 193, 207);
pub const MUTED: Color = Color::Rgb(98, 114, 164);
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54);
pub const BG_DARK: Color = Color::Rgb(30, 31, 41);

// ── Semantic styles ──────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT)
}

pub fn border_default() -> Style {
    Style::default().fg(MUTED)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(TEXT)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ACCENT)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(TEXT)
}

pub fn key_hint() -> Style {
    Style::default().fg(MUTED)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(CYAN).add_modifier(Modifier::BOLD)
}

// ── Domain colors ────────────────────────────────────────────────────

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Egregious => RED,
        Severity::Severe => CORAL,
        Severity::Moderate => YELLOW,
        Severity::Minor => GREEN,
        Severity::Unknown => MUTED,
    }
}

pub fn sync_status_color(status: SyncStatus) -> Color {
    match status {
        SyncStatus::Completed => GREEN,
        SyncStatus::Running | SyncStatus::Pending => YELLOW,
        SyncStatus::Failed => RED,
        SyncStatus::Cancelled | SyncStatus::Unknown => MUTED,
    }
}

pub fn connection_color(status: &ConnectionStatus) -> Color {
    match status {
        ConnectionStatus::Active => GREEN,
        ConnectionStatus::Expired => YELLOW,
        ConnectionStatus::Error | ConnectionStatus::Revoked => RED,
        ConnectionStatus::Unknown(_) => MUTED,
    }
}
