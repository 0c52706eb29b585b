use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::api::types::Role;
use crate::core::state::Message as ChatMessage;
use crate::tui::component::Component;
use crate::tui::components::widgets::{avatar, role_color, role_label, spinner};
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
pub const VERTICAL_OVERHEAD: u16 = 2;
/// Height of the "thinking" placeholder: one content line plus borders.
pub const PENDING_HEIGHT: u16 = 1 + VERTICAL_OVERHEAD;

/// A single chat message in a rounded box titled with the sender's avatar.
///
/// Transient: built each frame by `MessageList` for the rows in view.
/// User text is shown verbatim; assistant answers are rendered as markdown.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage) -> Self {
        Self { message }
    }

    fn body(message: &ChatMessage) -> Text<'static> {
        let style = Style::default().fg(role_color(message.role));
        let content = message.content.trim();
        match message.role {
            Role::User => Text::styled(content.to_string(), style),
            Role::Assistant => markdown::to_text(content, style),
        }
    }

    /// Rows this message occupies at `width`, borders included.
    ///
    /// Uses the same `Paragraph` that `render` draws, so the prediction and
    /// the drawn height cannot drift apart.
    pub fn calculate_height(message: &ChatMessage, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }
        let paragraph = Paragraph::new(Self::body(message)).wrap(Wrap { trim: false });
        let lines = paragraph.line_count(content_width) as u16;
        lines.max(1) + VERTICAL_OVERHEAD
    }
}

fn frame_block(role: Role) -> Block<'static> {
    let border = Style::default()
        .fg(role_color(role))
        .add_modifier(Modifier::DIM);
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(border)
        .title(Line::from(vec![
            avatar(role),
            Span::styled(format!(" {} ", role_label(role)), border),
        ]))
        .padding(Padding::horizontal(CONTENT_PAD_H))
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let block = frame_block(self.message.role);
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(Self::body(self.message))
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

/// Assistant-styled box with a spinner, shown while an answer is pending.
pub struct PendingReply {
    pub spinner_frame: usize,
}

impl Widget for PendingReply {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let block = frame_block(Role::Assistant);
        let inner = block.inner(area);
        block.render(area, buf);

        let style = Style::default()
            .fg(role_color(Role::Assistant))
            .add_modifier(Modifier::ITALIC);
        Paragraph::new(Line::from(vec![
            Span::styled(spinner(self.spinner_frame), style),
            Span::styled(" Thinking...", style),
        ]))
        .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::MessageId;
    use crate::test_support::buffer_lines;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn make(role: Role, content: &str) -> ChatMessage {
        ChatMessage {
            id: MessageId(1),
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn calculate_height_single_line() {
        let msg = make(Role::User, "Hello");
        assert_eq!(Message::calculate_height(&msg, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_empty_still_one_line() {
        let msg = make(Role::User, "   ");
        assert_eq!(Message::calculate_height(&msg, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_too_narrow_returns_minimum() {
        let msg = make(Role::User, "Hello world");
        assert_eq!(Message::calculate_height(&msg, HORIZONTAL_OVERHEAD), 1);
    }

    #[test]
    fn calculate_height_wraps() {
        let msg = make(Role::User, "Hello world");
        // content width 5: "Hello" | "world"
        assert_eq!(Message::calculate_height(&msg, 9), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_counts_markdown_lines() {
        let msg = make(Role::Assistant, "Intro\n\n- one\n- two");
        // "Intro", blank, "• one", "• two"
        assert_eq!(Message::calculate_height(&msg, 80), 4 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn renders_avatar_and_label() {
        let msg = make(Role::Assistant, "It is about **taxes**.");
        let mut terminal = Terminal::new(TestBackend::new(40, 3)).unwrap();
        terminal
            .draw(|f| f.render_widget(Message::new(&msg), f.area()))
            .unwrap();

        let lines = buffer_lines(terminal.backend().buffer());
        assert!(lines[0].contains("AI"));
        assert!(lines[0].contains("Assistant"));
        assert!(lines[1].contains("It is about taxes."));
    }
}
