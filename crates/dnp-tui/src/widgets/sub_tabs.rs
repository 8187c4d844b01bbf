//! Inline sub-tab bar used inside screens (blocklist views, report types).

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme;

/// One line with every label; the active one bracketed and highlighted.
pub fn render_sub_tabs<'a>(labels: &[&'a str], active_index: usize) -> Line<'a> {
    let mut spans = Vec::with_capacity(labels.len() * 2);
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme::key_hint()));
        }
        if i == active_index {
            spans.push(Span::styled(
                format!("[{label}]"),
                theme::tab_active().add_modifier(Modifier::UNDERLINED),
            ));
        } else {
            spans.push(Span::styled(*label, theme::tab_inactive()));
        }
    }
    Line::from(spans)
}

/// Key-hint footer: alternating key / description pairs.
pub fn render_hints<'a>(pairs: &[(&'a str, &'a str)]) -> Line<'a> {
    let mut spans = Vec::with_capacity(pairs.len() * 2 + 1);
    spans.push(Span::raw(" "));
    for (key, desc) in pairs {
        spans.push(Span::styled(format!(" {key} "), theme::key_hint_key()));
        spans.push(Span::styled(*desc, theme::key_hint()));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn active_tab_is_bracketed() {
        let line = render_sub_tabs(&["Effective", "Direct", "Exceptions"], 1);
        assert_eq!(text(&line), "Effective  [Direct]  Exceptions");
    }

    #[test]
    fn hints_pair_keys_with_descriptions() {
        let line = render_hints(&[("j/k", "move"), ("u", "unblock")]);
        assert_eq!(text(&line), "  j/k move u unblock");
    }
}
