//! # Upload Modal
//!
//! Overlay for choosing a local PDF and sending it to the backend. The path
//! is typed (or dropped/pasted) into a single-line field; the dialog's
//! status comes from `core::upload::UploadDialog`.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `UploadModalState` (the path being edited) lives in `TuiState`
//! - `UploadModal` is created each frame with borrowed state and props

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::core::upload::{UploadDialog, UploadStatus};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::widgets::{centered_rect, key_hint, spinner};
use crate::tui::event::TuiEvent;

const MODAL_WIDTH: u16 = 72;
const MODAL_HEIGHT: u16 = 9;

/// Events emitted by the upload modal.
#[derive(Debug, PartialEq)]
pub enum UploadEvent {
    Submit(String),
    Edited,
    Dismiss,
}

#[derive(Default)]
pub struct UploadModalState {
    pub path: String,
    /// Set by the event loop: editing is locked while an upload is running
    /// or has just succeeded.
    pub locked: bool,
}

impl UploadModalState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventHandler for UploadModalState {
    type Event = UploadEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if matches!(event, TuiEvent::Escape) {
            return Some(UploadEvent::Dismiss);
        }
        if self.locked {
            return None;
        }

        match event {
            TuiEvent::Submit => Some(UploadEvent::Submit(self.path.clone())),
            TuiEvent::InputChar(c) if *c != '\n' => {
                self.path.push(*c);
                Some(UploadEvent::Edited)
            }
            // Dropping a file onto most terminals pastes its path.
            TuiEvent::Paste(text) => {
                self.path.push_str(text.trim_end_matches(['\r', '\n']));
                Some(UploadEvent::Edited)
            }
            TuiEvent::Backspace => self.path.pop().map(|_| UploadEvent::Edited),
            _ => None,
        }
    }
}

pub struct UploadModal<'a> {
    pub state: &'a UploadModalState,
    pub dialog: &'a UploadDialog,
    pub spinner_frame: usize,
}

impl<'a> UploadModal<'a> {
    fn status_line(&self) -> Line<'static> {
        let Some(message) = self.dialog.message() else {
            return Line::default();
        };
        match &self.dialog.status {
            UploadStatus::Uploading => Line::from(vec![
                Span::styled(
                    format!("{} ", spinner(self.spinner_frame)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(message, Style::default().fg(Color::Yellow)),
            ]),
            UploadStatus::Succeeded { .. } => Line::styled(
                message,
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
            _ => Line::styled(message, Style::default().fg(Color::Red)),
        }
    }
}

impl<'a> Component for UploadModal<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(MODAL_WIDTH, MODAL_HEIGHT, area);
        frame.render_widget(Clear, overlay);

        let busy = !self.dialog.accepts_input();
        let mut hints = key_hint("Enter", "Upload", !busy);
        hints.push(Span::raw("  "));
        hints.extend(key_hint("Esc", "Cancel", true));

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Upload PDF Document ")
            .title_bottom(Line::from(hints).centered())
            .padding(Padding::new(1, 1, 1, 0));

        let field_style = if busy {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        let path_line = if self.state.path.is_empty() {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(
                    "/path/to/document.pdf",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ),
            ])
        } else {
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::Cyan)),
                Span::styled(self.state.path.clone(), field_style),
            ])
        };

        let lines = vec![
            Line::styled("Path to a PDF file:", Style::default().fg(Color::Gray)),
            path_line,
            Line::default(),
            self.status_line(),
        ];

        let inner = block.inner(overlay);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            overlay,
        );

        if !busy {
            let prefix = 2 + unicode_width::UnicodeWidthStr::width(self.state.path.as_str()) as u16;
            let x = (inner.x + prefix).min(inner.right().saturating_sub(1));
            frame.set_cursor_position((x, inner.y + 1));
        }
    }
}
