//! Small presentational pieces shared by the larger components: the loading
//! spinner, role avatars, key hints that stand in for buttons, and overlay
//! placement.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::api::types::Role;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

pub fn role_color(role: Role) -> Color {
    match role {
        Role::User => Color::Green,
        Role::Assistant => Color::Blue,
    }
}

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "You",
        Role::Assistant => "Assistant",
    }
}

/// " U " / " AI " badge in the role's color.
pub fn avatar(role: Role) -> Span<'static> {
    let text = match role {
        Role::User => " U ",
        Role::Assistant => " AI ",
    };
    Span::styled(
        text,
        Style::default()
            .fg(Color::Black)
            .bg(role_color(role))
            .add_modifier(Modifier::BOLD),
    )
}

/// A key hint rendered like a button: `[Ctrl+U] Upload PDF`.
/// Disabled hints are dimmed and cannot be told apart by color alone.
pub fn key_hint(key: &str, label: &str, enabled: bool) -> Vec<Span<'static>> {
    let (key_style, label_style) = if enabled {
        (
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Gray),
        )
    } else {
        (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        )
    };
    vec![
        Span::styled(format!("[{}]", key), key_style),
        Span::styled(format!(" {}", label), label_style),
    ]
}

/// A rect of fixed size centered in `outer`, clamped to fit.
pub fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(outer.height)),
        Constraint::Fill(1),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(outer.width)),
        Constraint::Fill(1),
    ])
    .areas(row);
    center
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_cycles() {
        assert_eq!(spinner(0), spinner(SPINNER_FRAMES.len()));
        assert_ne!(spinner(0), spinner(1));
    }

    #[test]
    fn avatars_differ_by_role() {
        assert_eq!(avatar(Role::User).content, " U ");
        assert_eq!(avatar(Role::Assistant).content, " AI ");
        assert_eq!(avatar(Role::User).style.bg, Some(Color::Green));
    }

    #[test]
    fn disabled_hint_is_dim() {
        let spans = key_hint("Enter", "Send", false);
        assert_eq!(spans[0].content, "[Enter]");
        assert_eq!(spans[0].style.fg, Some(Color::DarkGray));
    }

    #[test]
    fn centered_rect_fits_and_centers() {
        let outer = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(60, 10, outer);
        assert_eq!(rect.width, 60);
        assert_eq!(rect.height, 10);
        assert_eq!(rect.x, 20);
        assert_eq!(rect.y, 15);

        let small = centered_rect(60, 10, Rect::new(0, 0, 30, 5));
        assert_eq!((small.width, small.height), (30, 5));
    }
}
