//! # Header Component
//!
//! One-line bar at the top of the screen.
//!
//! ```text
//! docchat │ report.pdf │ 3 documents │ status…        [Ctrl+U] Upload PDF  [Ctrl+O] Select Document
//! ```
//!
//! Stateless: everything it shows is passed in as props.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;
use crate::tui::components::widgets::key_hint;

pub struct Header<'a> {
    /// Filename of the active document, if any.
    pub document_name: Option<&'a str>,
    pub document_count: usize,
    pub status_message: &'a str,
    /// Shortcuts are shown disabled while a modal is open.
    pub shortcuts_enabled: bool,
}

impl<'a> Header<'a> {
    fn left_line(&self) -> Line<'static> {
        let sep = Span::styled(" │ ", Style::default().fg(Color::DarkGray));
        let mut spans = vec![Span::styled(
            "docchat",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];

        spans.push(sep.clone());
        spans.push(match self.document_name {
            Some(name) => Span::styled(name.to_string(), Style::default().fg(Color::White)),
            None => Span::styled("no document", Style::default().fg(Color::DarkGray)),
        });

        spans.push(sep.clone());
        let noun = if self.document_count == 1 {
            "document"
        } else {
            "documents"
        };
        spans.push(Span::styled(
            format!("{} {}", self.document_count, noun),
            Style::default().fg(Color::Gray),
        ));

        if !self.status_message.is_empty() {
            spans.push(sep);
            spans.push(Span::styled(
                self.status_message.to_string(),
                Style::default().fg(Color::Yellow),
            ));
        }
        Line::from(spans)
    }

    fn right_line(&self) -> Line<'static> {
        let mut spans = key_hint("Ctrl+U", "Upload PDF", self.shortcuts_enabled);
        spans.push(Span::raw("  "));
        spans.extend(key_hint("Ctrl+O", "Select Document", self.shortcuts_enabled));
        Line::from(spans).right_aligned()
    }
}

impl<'a> Component for Header<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let right = self.right_line();
        let right_width = right.width() as u16;
        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(right_width)]).areas(area);

        frame.render_widget(Paragraph::new(self.left_line()), left_area);
        frame.render_widget(Paragraph::new(right), right_area);
    }
}
