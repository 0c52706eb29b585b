//! # Welcome Component
//!
//! Shown in the main area while no document is selected. The copy depends
//! on whether the backend already has documents to choose from.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::tui::component::Component;
use crate::tui::components::widgets::key_hint;

pub const WELCOME_TITLE: &str = "Welcome!";
pub const PROMPT_WITH_DOCUMENTS: &str =
    "Please select a document to start chatting, or upload a new one.";
pub const PROMPT_WITHOUT_DOCUMENTS: &str =
    "Upload a PDF document to begin asking questions about its content.";

pub struct Welcome {
    pub has_documents: bool,
}

impl Welcome {
    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                WELCOME_TITLE,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ];

        let prompt = if self.has_documents {
            PROMPT_WITH_DOCUMENTS
        } else {
            PROMPT_WITHOUT_DOCUMENTS
        };
        lines.push(Line::from(Span::styled(prompt, Style::default().fg(Color::Gray))));
        lines.push(Line::default());

        let mut hints = Vec::new();
        if self.has_documents {
            hints.extend(key_hint("Ctrl+O", "Select Existing Document", true));
            hints.push(Span::raw("   "));
        }
        hints.extend(key_hint("Ctrl+U", "Upload PDF", true));
        lines.push(Line::from(hints));
        lines
    }
}

impl Component for Welcome {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = self.lines();
        let height = (lines.len() as u16 + 2).min(area.height);
        let [center] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::test_support::buffer_lines;

    fn screen(welcome: &mut Welcome) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        terminal.draw(|f| welcome.render(f, f.area())).unwrap();
        buffer_lines(terminal.backend().buffer()).join("\n")
    }

    #[test]
    fn offers_selection_when_documents_exist() {
        let text = screen(&mut Welcome { has_documents: true });
        assert!(text.contains(WELCOME_TITLE));
        assert!(text.contains(PROMPT_WITH_DOCUMENTS));
        assert!(text.contains("Select Existing Document"));
    }

    #[test]
    fn asks_for_upload_when_empty() {
        let text = screen(&mut Welcome {
            has_documents: false,
        });
        assert!(text.contains(PROMPT_WITHOUT_DOCUMENTS));
        assert!(!text.contains("Select Existing Document"));
    }
}
