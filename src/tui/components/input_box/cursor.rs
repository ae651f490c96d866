//! Cursor tracking and visual line layout for the InputBox.
//!
//! The draft is word-wrapped with `textwrap` the same way message bodies are
//! (first fit on ASCII spaces, over-long words broken by display width), so a
//! draft lays out as it will once sent. Rendering and cursor placement both go
//! through [`visual_rows`], so they always agree.

use std::ops::Range;

use ratatui::layout::Rect;
use textwrap::WordSeparator;
use textwrap::core::break_words;
use textwrap::wrap_algorithms::wrap_first_fit;
use unicode_width::UnicodeWidthStr;

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before internal scrolling kicks in
pub(super) const MAX_VISIBLE_LINES: u16 = 5;
/// Offset from area edge to the first content cell (border + padding)
const CONTENT_OFFSET_X: u16 = 2;
const CONTENT_OFFSET_Y: u16 = 1;

/// Inner content width for a box of `outer_width`. 0 if too narrow.
pub(super) fn inner_width(outer_width: u16) -> u16 {
    outer_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Byte ranges of each visual row. Newlines end a row and are not part of it.
/// Trailing spaces stay on the row they follow. Always returns at least one row.
pub(super) fn visual_rows(text: &str, width: u16) -> Vec<Range<usize>> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let words = break_words(WordSeparator::AsciiSpace.find_words(line), width);
        let mut row_start = line_start;
        // Yields one (possibly empty) row even for an empty line
        for row in wrap_first_fit(&words, &[width as f64]) {
            let len: usize = row
                .iter()
                .map(|w| w.word.len() + w.whitespace.len() + w.penalty.len())
                .sum();
            rows.push(row_start..row_start + len);
            row_start += len;
        }
        line_start += line.len() + 1;
    }
    rows
}

/// Cursor and scroll state, separated from the draft text.
pub(super) struct CursorState {
    /// Cursor position as byte offset in the draft (0..=len)
    pub pos: usize,
    /// First visible row when the draft is taller than the box
    pub scroll_offset: usize,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Row index and display column of the cursor.
    pub fn row_col(&self, text: &str, rows: &[Range<usize>]) -> (usize, u16) {
        let row = rows
            .iter()
            .rposition(|r| r.start <= self.pos)
            .unwrap_or(0);
        let start = rows.get(row).map_or(0, |r| r.start);
        let col = text[start..self.pos].width();
        (row, u16::try_from(col).unwrap_or(u16::MAX))
    }

    /// Keep the cursor row inside the visible window.
    pub fn update_scroll_offset(&mut self, text: &str, rows: &[Range<usize>]) {
        if rows.len() <= usize::from(MAX_VISIBLE_LINES) {
            self.scroll_offset = 0;
            return;
        }
        let (row, _) = self.row_col(text, rows);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + usize::from(MAX_VISIBLE_LINES) {
            self.scroll_offset = row + 1 - usize::from(MAX_VISIBLE_LINES);
        }
    }

    /// Screen position of the cursor inside the box at `area`.
    pub fn screen_pos(&self, text: &str, rows: &[Range<usize>], area: Rect) -> (u16, u16) {
        let (row, col) = self.row_col(text, rows);
        let max_col = inner_width(area.width);
        let visible_row = row
            .saturating_sub(self.scroll_offset)
            .min(usize::from(MAX_VISIBLE_LINES - 1)) as u16;
        (
            area.x + CONTENT_OFFSET_X + col.min(max_col),
            area.y + CONTENT_OFFSET_Y + visible_row,
        )
    }
}
