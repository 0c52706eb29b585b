//! # Document Picker Component
//!
//! Overlay listing the backend's documents. Opened with Ctrl+O, dismissed
//! with Esc, Enter opens the highlighted document.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `DocumentPickerState` (cursor position) lives in `TuiState`
//! - `DocumentPickerView` is created each frame with borrowed state; the
//!   list itself comes from `core::picker::DocumentPicker`

use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, List, ListItem, ListState, Padding, Paragraph};

use crate::api::{Document, DocumentId};
use crate::core::picker::{DocumentPicker, MSG_NO_DOCUMENTS, PickerStatus};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::widgets::{centered_rect, key_hint, spinner};
use crate::tui::event::TuiEvent;

const MODAL_WIDTH: u16 = 76;
const MODAL_HEIGHT: u16 = 20;

/// Events emitted by the document picker.
#[derive(Debug, PartialEq)]
pub enum PickerEvent {
    Choose(usize),
    Dismiss,
}

#[derive(Default)]
pub struct DocumentPickerState {
    pub selected: usize,
    pub list_state: ListState,
    len: usize,
}

impl DocumentPickerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tell the state how many rows exist. Called by the event loop whenever
    /// the picker's list may have changed.
    pub fn sync(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.list_state.select(None);
        } else {
            self.selected = self.selected.min(len - 1);
            self.list_state.select(Some(self.selected));
        }
    }
}

impl EventHandler for DocumentPickerState {
    type Event = PickerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Escape => Some(PickerEvent::Dismiss),
            TuiEvent::CursorUp | TuiEvent::ScrollUp => {
                if self.len > 0 {
                    self.selected = self.selected.saturating_sub(1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                if self.len > 0 {
                    self.selected = (self.selected + 1).min(self.len - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => (self.len > 0).then_some(PickerEvent::Choose(self.selected)),
            _ => None,
        }
    }
}

/// Upload date in the local timezone, date only.
pub fn format_upload_date(date: Option<DateTime<Utc>>) -> String {
    match date {
        Some(date) => date.with_timezone(&Local).format("%Y-%m-%d").to_string(),
        None => "unknown".to_string(),
    }
}

fn document_item(doc: &Document, is_active: bool, is_selected: bool) -> ListItem<'static> {
    let name_style = if is_selected {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    let mut title = vec![Span::styled(doc.original_filename.clone(), name_style)];
    if is_active {
        title.push(Span::styled(" (active)", Style::default().fg(Color::Green)));
    }

    let details = format!(
        "ID: {} - Uploaded: {}",
        doc.id,
        format_upload_date(doc.upload_date)
    );

    ListItem::new(vec![
        Line::from(title),
        Line::styled(details, Style::default().fg(Color::DarkGray)),
    ])
}

pub struct DocumentPickerView<'a> {
    pub state: &'a mut DocumentPickerState,
    pub picker: &'a DocumentPicker,
    pub active: Option<&'a DocumentId>,
    pub spinner_frame: usize,
}

impl<'a> Component for DocumentPickerView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(MODAL_WIDTH, MODAL_HEIGHT, area);
        frame.render_widget(Clear, overlay);

        let mut hints = key_hint("↑↓", "Move", true);
        hints.push(Span::raw("  "));
        hints.extend(key_hint("Enter", "Open", true));
        hints.push(Span::raw("  "));
        hints.extend(key_hint("Esc", "Close", true));

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Select a Document ")
            .title_bottom(Line::from(hints).centered())
            .padding(Padding::new(1, 1, 1, 0));

        let notice = |text: String, style: Style| {
            Paragraph::new(Line::styled(text, style))
                .alignment(Alignment::Center)
                .block(block.clone())
        };

        match &self.picker.status {
            PickerStatus::Loading => frame.render_widget(
                notice(
                    format!("{} Loading documents...", spinner(self.spinner_frame)),
                    Style::default().fg(Color::Yellow),
                ),
                overlay,
            ),
            PickerStatus::Failed(msg) => frame.render_widget(
                notice(msg.clone(), Style::default().fg(Color::Red)),
                overlay,
            ),
            PickerStatus::Loaded(docs) if docs.is_empty() => frame.render_widget(
                notice(
                    MSG_NO_DOCUMENTS.to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                overlay,
            ),
            PickerStatus::Loaded(docs) => {
                self.state.sync(docs.len());
                let items: Vec<ListItem> = docs
                    .iter()
                    .enumerate()
                    .map(|(i, doc)| {
                        let is_active = self.active == Some(&doc.id);
                        document_item(doc, is_active, i == self.state.selected)
                    })
                    .collect();
                let list = List::new(items).block(block);
                frame.render_stateful_widget(list, overlay, &mut self.state.list_state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::picker::MSG_LOAD_FAILED;
    use crate::test_support::buffer_lines;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(picker: &DocumentPicker, active: Option<&DocumentId>) -> String {
        let mut state = DocumentPickerState::new();
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();
        terminal
            .draw(|f| {
                DocumentPickerView {
                    state: &mut state,
                    picker,
                    active,
                    spinner_frame: 0,
                }
                .render(f, f.area())
            })
            .unwrap();
        buffer_lines(terminal.backend().buffer()).join("\n")
    }

    fn loaded(docs: Vec<Document>) -> DocumentPicker {
        DocumentPicker {
            ticket: 1,
            generation: 0,
            status: PickerStatus::Loaded(docs),
        }
    }

    #[test]
    fn navigation_clamps_to_list() {
        let mut state = DocumentPickerState::new();
        state.sync(2);
        state.handle_event(&TuiEvent::CursorDown);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.selected, 1);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit),
            Some(PickerEvent::Choose(1))
        );
        state.handle_event(&TuiEvent::CursorUp);
        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn empty_list_cannot_choose() {
        let mut state = DocumentPickerState::new();
        state.sync(0);
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
        assert_eq!(
            state.handle_event(&TuiEvent::Escape),
            Some(PickerEvent::Dismiss)
        );
    }

    #[test]
    fn sync_clamps_after_list_shrinks() {
        let mut state = DocumentPickerState::new();
        state.sync(5);
        state.selected = 4;
        state.sync(2);
        assert_eq!(state.selected, 1);
    }

    #[test]
    fn format_date_handles_missing() {
        assert_eq!(format_upload_date(None), "unknown");
        let date = DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_upload_date(Some(date)).len(), "2024-06-01".len());
    }

    #[test]
    fn renders_documents_with_details() {
        let picker = loaded(vec![
            Document::new("1", "report.pdf"),
            Document::new("2", "slides.pdf"),
        ]);
        let active = DocumentId::new("2");
        let text = screen(&picker, Some(&active));
        assert!(text.contains("Select a Document"));
        assert!(text.contains("report.pdf"));
        assert!(text.contains("ID: 1 - Uploaded: unknown"));
        assert!(text.contains("slides.pdf (active)"));
    }

    #[test]
    fn renders_status_messages() {
        assert!(screen(&loaded(vec![]), None).contains(MSG_NO_DOCUMENTS));

        let failed = DocumentPicker {
            ticket: 1,
            generation: 0,
            status: PickerStatus::Failed(MSG_LOAD_FAILED.to_string()),
        };
        assert!(screen(&failed, None).contains(MSG_LOAD_FAILED));

        let loading = DocumentPicker::new(1, 0);
        assert!(screen(&loading, None).contains("Loading documents..."));
    }
}
