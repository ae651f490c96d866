//! # TitleBar Component
//!
//! Top status bar: who we are, how many messages are shown, and transient
//! status such as `Sending...`.
//!
//! Stateless. All fields are props from the parent, so it is rebuilt every
//! frame:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(identity, app.messages.len(), status, has_unseen);
//! title_bar.render(frame, area);
//! ```
//!
//! Text layout, most to least important:
//!
//! 1. `Chat (as: alice) · 12 messages | Sending... | ↓ New`
//! 2. `Chat (as: alice) · 12 messages | Sending...`
//! 3. `Chat (as: alice) · 12 messages`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

pub struct TitleBar {
    /// Display name we post as
    pub identity: String,
    pub message_count: usize,
    /// Transient status, empty when idle
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(
        identity: String,
        message_count: usize,
        status_message: String,
        has_unseen_content: bool,
    ) -> Self {
        Self {
            identity,
            message_count,
            status_message,
            has_unseen_content,
        }
    }

    fn text(&self) -> String {
        let noun = if self.message_count == 1 { "message" } else { "messages" };
        let mut text = format!(
            "Chat (as: {}) · {} {}",
            self.identity, self.message_count, noun
        );
        if !self.status_message.is_empty() {
            text.push_str(" | ");
            text.push_str(&self.status_message);
        }
        if self.has_unseen_content {
            text.push_str(" | ↓ New");
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}
