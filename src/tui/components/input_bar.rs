//! # InputBar Component
//!
//! Multi-line question input under the chat. Enter submits, Ctrl+J or
//! Shift+Enter inserts a newline. The bar grows with its content up to
//! `MAX_VISIBLE_LINES`, then scrolls to keep the cursor in view.
//!
//! While an answer is pending the bar is disabled: it ignores every event and
//! shows a spinner in place of the send hint.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::widgets::{key_hint, spinner};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
const MAX_VISIBLE_LINES: u16 = 5;

pub const PLACEHOLDER: &str = "Ask a question about the document...";

pub enum InputEvent {
    Submit(String),
    ContentChanged,
}

pub struct InputBar {
    buffer: String,
    /// Byte offset into `buffer`, always on a char boundary.
    cursor: usize,
    /// Set by the event loop each frame.
    pub disabled: bool,
    pub focused: bool,
    pub spinner_frame: usize,
}

impl Default for InputBar {
    fn default() -> Self {
        Self::new()
    }
}

fn wrap_options(width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(width.max(1) as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Screen rows for one logical line (no '\n' inside).
fn wrap_logical(line: &str, width: u16) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }
    let rows: Vec<String> = textwrap::wrap(line, wrap_options(width))
        .into_iter()
        .map(|row| row.into_owned())
        .collect();
    if rows.is_empty() { vec![String::new()] } else { rows }
}

fn wrap_all(text: &str, width: u16) -> Vec<String> {
    text.split('\n').flat_map(|line| wrap_logical(line, width)).collect()
}

/// (row, column) of the cursor within the wrapped text.
fn cursor_row_col(text: &str, cursor: usize, width: u16) -> (u16, u16) {
    let before = &text[..cursor];
    let mut logical = before.split('\n');
    let current = logical.next_back().unwrap_or_default();
    let rows_above: usize = logical.map(|line| wrap_logical(line, width).len()).sum();

    let segments = wrap_logical(current, width);
    let consumed: usize = segments[..segments.len() - 1]
        .iter()
        .map(|s| s.chars().count())
        .sum();
    // Skip the separator spaces textwrap dropped between segments.
    let tail: String = current
        .chars()
        .skip(consumed)
        .skip_while(|c| *c == ' ' && consumed > 0)
        .collect();

    let row = rows_above + segments.len() - 1;
    (row as u16, tail.width() as u16)
}

impl InputBar {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            disabled: false,
            focused: true,
            spinner_frame: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Required height for current content, clamped to viewport limits.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(HORIZONTAL_OVERHEAD);
        let lines = wrap_all(&self.buffer, inner).len() as u16;
        lines.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.buffer.len())
    }

    fn block(&self) -> Block<'static> {
        let (border, title) = if self.disabled {
            (
                Style::default().fg(Color::DarkGray),
                Line::from(Span::styled(
                    format!(" {} Waiting for answer... ", spinner(self.spinner_frame)),
                    Style::default().fg(Color::DarkGray),
                )),
            )
        } else {
            (
                Style::default().fg(Color::Green),
                Line::from(" Ask a question "),
            )
        };

        let mut hints = key_hint("Enter", "Send", !self.disabled);
        hints.push(Span::raw("  "));
        hints.extend(key_hint("Ctrl+J", "New line", !self.disabled));

        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(title)
            .title_bottom(Line::from(hints).right_aligned())
            .padding(Padding::horizontal(1))
    }
}

impl Component for InputBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = self.block();
        let inner = block.inner(area);

        if self.buffer.is_empty() {
            let placeholder = Paragraph::new(Span::styled(
                PLACEHOLDER,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))
            .block(block);
            frame.render_widget(placeholder, area);
            if self.focused && !self.disabled {
                frame.set_cursor_position((inner.x, inner.y));
            }
            return;
        }

        let rows = wrap_all(&self.buffer, inner.width);
        let (cursor_row, cursor_col) = cursor_row_col(&self.buffer, self.cursor, inner.width);
        let scroll = cursor_row.saturating_sub(inner.height.saturating_sub(1));

        let style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        let visible: Vec<Line> = rows
            .into_iter()
            .skip(scroll as usize)
            .take(inner.height as usize)
            .map(|row| Line::styled(row, style))
            .collect();

        frame.render_widget(Paragraph::new(visible).block(block), area);

        if self.focused && !self.disabled {
            let x = (inner.x + cursor_col).min(inner.right().saturating_sub(1));
            let y = inner.y + cursor_row - scroll;
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for InputBar {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }

        match event {
            TuiEvent::InputChar(c) => {
                let mut utf8 = [0u8; 4];
                self.insert(c.encode_utf8(&mut utf8));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Normalise CRLF from pasted Windows text
                self.insert(&text.replace("\r\n", "\n"));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = self.prev_boundary();
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = self.next_boundary();
                self.buffer.drain(self.cursor..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = self.prev_boundary();
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = self.next_boundary();
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => {
                let start = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                (self.cursor != start).then(|| {
                    self.cursor = start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let end = self.buffer[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.buffer.len());
                (self.cursor != end).then(|| {
                    self.cursor = end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
