//! # InputBox Component
//!
//! The compose box: a multi-line draft editor with a `Send` button.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, newline via Shift+Enter)
//! - Handle editing (backspace, delete, cursor movement)
//! - Emit `Submit` on Enter or a click on the `Send` button
//! - Show a placeholder while the draft is empty, and a disabled button
//!
//! ## State Management
//!
//! The draft is a [`ComposeState`]. Submitting does **not** clear it: the
//! draft is cleared through [`InputBox::reset`] only once the channel has
//! accepted the message, so a failed send leaves the text in place.

mod cursor;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::compose::ComposeState;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::{CursorState, MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, inner_width, visual_rows};

const PLACEHOLDER: &str = "Type a message...";
const SEND_LABEL: &str = "[ Send ]";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the draft (Enter or Send button). Carries the raw text.
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

/// Draft editor with a send button.
///
/// # Props
///
/// - `dimmed`: focus is on the history, so the box is drawn inactive
///
/// # State
///
/// - `compose`: the draft text
/// - `cursor`: cursor byte position and internal scroll
/// - `send_button`: where the button was drawn last frame (for click hit testing)
pub struct InputBox {
    pub compose: ComposeState,
    pub dimmed: bool,
    cursor: CursorState,
    send_button: Rect,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            compose: ComposeState::new(),
            dimmed: false,
            cursor: CursorState::new(),
            send_button: Rect::default(),
        }
    }

    /// Clear the draft after a successful send.
    pub fn reset(&mut self) {
        self.compose.clear();
        self.cursor.reset();
    }

    /// Height needed for the current draft, clamped to the visible maximum.
    pub fn calculate_height(&self, outer_width: u16) -> u16 {
        let rows = visual_rows(self.compose.text(), inner_width(outer_width))
            .len()
            .min(usize::from(MAX_VISIBLE_LINES)) as u16;
        rows + VERTICAL_OVERHEAD
    }

    /// True if the screen cell (col, row) is on the Send button.
    pub fn hits_send_button(&self, col: u16, row: u16) -> bool {
        self.send_button.contains(ratatui::layout::Position { x: col, y: row })
    }

    fn render_send_button(&mut self, frame: &mut Frame, area: Rect) {
        let label_width = SEND_LABEL.width() as u16;
        // Sits on the top border, one cell in from the right corner
        let x = area.right().saturating_sub(label_width + 1).max(area.x);
        self.send_button = Rect::new(x, area.y, label_width, 1).intersection(area);

        let style = if self.compose.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        };
        frame.render_widget(Span::styled(SEND_LABEL, style), self.send_button);
    }

    fn insert_text(&mut self, text: &str) {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.cursor.pos = self.compose.insert_str(self.cursor.pos, &normalized);
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let text = self.compose.text();
        let rows = visual_rows(text, inner_width(area.width));
        self.cursor.update_scroll_offset(text, &rows);

        let border_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Message ")
            .padding(Padding::horizontal(1));

        let content = if text.is_empty() {
            Paragraph::new(PLACEHOLDER).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let lines: Vec<Line> = rows
                .iter()
                .skip(self.cursor.scroll_offset)
                .take(MAX_VISIBLE_LINES as usize)
                .map(|r| Line::from(&text[r.clone()]))
                .collect();
            Paragraph::new(lines)
        };

        frame.render_widget(content.block(block), area);
        self.render_send_button(frame, area);

        if !self.dimmed {
            let (x, y) = self.cursor.screen_pos(self.compose.text(), &rows, area);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.cursor.pos = self.compose.insert_char(self.cursor.pos, *c);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                self.insert_text(text);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                let prev = self.compose.delete_before(self.cursor.pos)?;
                self.cursor.pos = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => self
                .compose
                .delete_at(self.cursor.pos)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::CursorLeft => {
                self.cursor.pos = self.compose.prev_boundary(self.cursor.pos)?;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorRight => {
                self.cursor.pos = self.compose.next_boundary(self.cursor.pos)?;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorHome => {
                let start = self.compose.line_start(self.cursor.pos);
                (self.cursor.pos != start).then(|| {
                    self.cursor.pos = start;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                let end = self.compose.line_end(self.cursor.pos);
                (self.cursor.pos != end).then(|| {
                    self.cursor.pos = end;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => Some(InputEvent::Submit(self.compose.text().to_string())),
            TuiEvent::MouseClick(col, row) if self.hits_send_button(*col, *row) => {
                Some(InputEvent::Submit(self.compose.text().to_string()))
            }
            _ => None,
        }
    }
}
