//! # MessageList Component
//!
//! Scrollable view of the chat history.
//!
//! ## Responsibilities
//!
//! - Display messages in channel order
//! - Ease the viewport down to the newest message whenever the list changes
//! - Manual scrolling (arrows, page keys, mouse wheel)
//! - Cache message heights so only visible messages are laid out and drawn
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the message slice (props).
//!
//! Late arrivals can be inserted anywhere in the list, so cached heights are
//! keyed by serial rather than by index. Messages are immutable once
//! delivered, which keeps a cached height valid until the width changes.

use std::collections::HashMap;

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::appearance::Appearance;
use crate::core::message::{Message, Serial};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageView;
use crate::tui::event::TuiEvent;

const EMPTY_PLACEHOLDER: &str = "No messages yet";

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// True when content exists below the viewport
    pub has_unseen_content: bool,
    /// Set when the list changed; the viewport eases toward the bottom until it arrives
    following_newest: bool,
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
            viewport_height: 0,
            has_unseen_content: false,
            following_newest: false,
        }
    }

    /// Start easing toward the newest message.
    pub fn scroll_to_newest(&mut self) {
        self.following_newest = true;
    }

    /// True while a smooth scroll is still in progress.
    pub fn is_animating(&self) -> bool {
        self.following_newest
    }

    fn max_offset(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Move half the remaining distance toward the bottom (at least one row).
    fn step_toward_newest(&mut self) {
        let target = self.max_offset();
        let current = self.scroll_state.offset().y;

        let next = if current >= target {
            target
        } else {
            current + (target - current).div_ceil(2)
        };
        self.scroll_state.set_offset(Position { x: 0, y: next });

        if next == target {
            self.following_newest = false;
        }
    }
}

/// Scrollable chat history component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub appearance: &'a Appearance,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [Message],
        appearance: &'a Appearance,
    ) -> Self {
        Self {
            state,
            messages,
            appearance,
        }
    }

    fn render_placeholder(&mut self, frame: &mut Frame, area: Rect) {
        self.state.following_newest = false;
        self.state.has_unseen_content = false;
        let row = Rect {
            y: area.y + area.height / 2,
            height: area.height.min(1),
            ..area
        };
        let placeholder = Paragraph::new(EMPTY_PLACEHOLDER)
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
        frame.render_widget(placeholder, row);
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.viewport_height = area.height;
        if self.messages.is_empty() {
            self.render_placeholder(frame, area);
            return;
        }

        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Update layout cache
        self.state.layout.update(self.messages, content_width);
        let total_height = self.state.layout.total_height();

        // 2. Scroll: ease toward the newest message, or keep the user's offset in bounds
        if self.state.following_newest {
            self.state.step_toward_newest();
        } else {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for i in visible_range {
            let top = self.state.layout.top_of(i);
            let height = self.state.layout.height_of(i);
            let rect = Rect::new(0, top, content_width, height);
            scroll_view.render_widget(MessageView::new(&self.messages[i], self.appearance), rect);
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        self.state.has_unseen_content = self.state.scroll_state.offset().y < self.state.max_offset();
    }
}

impl EventHandler for MessageListState {
    type Event = (); // Scrolling is handled internally

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.following_newest = false;
                self.scroll_state.scroll_up();
            }
            TuiEvent::ScrollDown => {
                self.following_newest = false;
                self.scroll_state.scroll_down();
                self.clamp_scroll();
            }
            TuiEvent::ScrollPageUp => {
                self.following_newest = false;
                self.scroll_state.scroll_page_up();
            }
            TuiEvent::ScrollPageDown => {
                self.following_newest = false;
                self.scroll_state.scroll_page_down();
                self.clamp_scroll();
            }
            TuiEvent::ScrollToBottom => self.scroll_to_newest(),
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
///
/// Scroll positions are `u16`, so at most `u16::MAX` rows can be laid out.
/// Once the history is taller than that, the oldest messages fall out of the
/// laid-out window (`first_index`) so the newest ones stay reachable.
#[derive(Default)]
pub struct LayoutCache {
    heights: HashMap<Serial, u16>,
    content_width: u16,
    /// Index of the oldest message inside the laid-out window
    first: usize,
    /// Running bottom edge of each message in the window, in list order
    pub prefix_heights: Vec<u16>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute positions for `messages`, measuring only messages not seen at this width.
    pub fn update(&mut self, messages: &[Message], content_width: u16) {
        if self.content_width != content_width {
            self.heights.clear();
            self.content_width = content_width;
        }

        let heights: Vec<u16> = messages
            .iter()
            .map(|message| {
                *self
                    .heights
                    .entry(message.serial.clone())
                    .or_insert_with(|| MessageView::calculate_height(message, content_width))
            })
            .collect();

        let mut span: u32 = 0;
        self.first = heights
            .iter()
            .rposition(|&h| {
                span += u32::from(h);
                span > u32::from(u16::MAX)
            })
            .map_or(0, |i| i + 1);

        self.prefix_heights.clear();
        let mut bottom: u16 = 0;
        for &height in &heights[self.first..] {
            bottom = bottom.saturating_add(height);
            self.prefix_heights.push(bottom);
        }
    }

    /// Index of the oldest message that is laid out. 0 unless the history overflows.
    pub fn first_index(&self) -> usize {
        self.first
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn cached_count(&self) -> usize {
        self.heights.len()
    }

    /// Top row of the message at `index` (an index into the full list).
    pub fn top_of(&self, index: usize) -> u16 {
        match index - self.first {
            0 => 0,
            local => self.prefix_heights[local - 1],
        }
    }

    pub fn height_of(&self, index: usize) -> u16 {
        self.prefix_heights[index - self.first] - self.top_of(index)
    }

    /// Indices of messages intersecting the viewport, padded by half a screen each way.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        self.first + start..self.first + end
    }
}
