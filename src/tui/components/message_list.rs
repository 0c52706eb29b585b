//! # MessageList Component
//!
//! Scrollable view of the conversation with the active document.
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the message slice
//! (props). Heights are cached per message: messages never change once
//! appended, so the cache only grows until the width changes or the
//! conversation is replaced by a different document's.
//!
//! Whenever a message is added or a request starts, the view jumps back to
//! the newest entry. Scrolling up detaches it until the user scrolls back to
//! the bottom.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::state::{Message as ChatMessage, MessageId};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{Message, PENDING_HEIGHT, PendingReply};
use crate::tui::event::TuiEvent;

/// Scroll position and height cache for the conversation view. Lives in
/// `TuiState` and is replaced whenever the active document changes.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on every frame.
    pub stick_to_bottom: bool,
    /// Viewport height seen by the last render, used when clamping between frames.
    pub viewport_height: u16,
    /// Whether the pending placeholder was shown last frame.
    was_pending: bool,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
            was_pending: false,
        }
    }

    fn content_height(&self) -> u16 {
        self.layout.total_height()
            + if self.was_pending { PENDING_HEIGHT } else { 0 }
    }

    /// Keep the offset inside the canvas after content or viewport shrank.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.content_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll if the user has scrolled back down to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.content_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [ChatMessage],
    pub is_pending: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [ChatMessage],
        is_pending: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            messages,
            is_pending,
            spinner_frame,
        }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar

        // 1. Bring the height cache up to date.
        let layout = &mut self.state.layout;
        let previous_count = layout.heights.len();
        let reusable = layout.reusable_count(self.messages, content_width);
        layout.heights.truncate(reusable);
        for message in &self.messages[layout.heights.len()..] {
            layout
                .heights
                .push(Message::calculate_height(message, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(self.messages, content_width);

        // New content (or a new conversation) snaps back to the newest entry.
        let grew = self.messages.len() != previous_count;
        let started_waiting = self.is_pending && !self.state.was_pending;
        if grew || started_waiting {
            self.state.stick_to_bottom = true;
        }
        self.state.was_pending = self.is_pending;

        let messages_height = self.state.layout.total_height();
        let pending_height = if self.is_pending { PENDING_HEIGHT } else { 0 };
        let canvas_height = messages_height + pending_height;

        // 2. A detached view must not scroll past the last row.
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render the rows in view into a ScrollView.
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible {
            let top = self.state.layout.top_of(i);
            let rect = Rect::new(0, top, content_width, self.state.layout.heights[i]);
            scroll_view.render_widget(Message::new(&self.messages[i]), rect);
        }

        if self.is_pending {
            let rect = Rect::new(0, messages_height, content_width, PENDING_HEIGHT);
            scroll_view.render_widget(
                PendingReply {
                    spinner_frame: self.spinner_frame,
                },
                rect,
            );
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached per-message heights for one conversation at one width.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    content_width: u16,
    /// First message of the cached conversation. A different first id means
    /// the document changed and nothing can be reused.
    first_id: Option<MessageId>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            content_width: 0,
            first_id: None,
        }
    }

    /// How many cached heights are still valid for `messages` at `content_width`.
    pub fn reusable_count(&self, messages: &[ChatMessage], content_width: u16) -> usize {
        if self.content_width != content_width {
            return 0;
        }
        if messages.first().map(|m| m.id) != self.first_id {
            return 0;
        }
        if messages.len() < self.heights.len() {
            return 0;
        }
        self.heights.len()
    }

    pub fn update_metadata(&mut self, messages: &[ChatMessage], content_width: u16) {
        self.content_width = content_width;
        self.first_id = messages.first().map(|m| m.id);
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Canvas row where message `index` starts.
    pub fn top_of(&self, index: usize) -> u16 {
        if index == 0 {
            0
        } else {
            self.prefix_heights[index - 1]
        }
    }

    /// Indices of messages that intersect the viewport, with half a screen
    /// of slack on either side.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let slack = viewport_height / 2;
        let from = scroll_offset.saturating_sub(slack);
        let to = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(slack);

        let start = self.prefix_heights.partition_point(|&end| end <= from);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < to)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }
}
