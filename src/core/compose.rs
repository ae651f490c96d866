//! Draft text for the compose box.
//!
//! `ComposeState` is the editable buffer behind the input box. Positions are
//! byte offsets that always sit on a char boundary; the editing helpers keep
//! them there.

/// The user's unsent draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeState {
    text: String,
}

impl ComposeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True when the draft holds nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Text to send, or `None` if the draft is blank.
    pub fn trimmed(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Insert `c` at `pos`, returning the position just after it.
    pub fn insert_char(&mut self, pos: usize, c: char) -> usize {
        self.text.insert(pos, c);
        pos + c.len_utf8()
    }

    /// Insert `s` at `pos`, returning the position just after it.
    pub fn insert_str(&mut self, pos: usize, s: &str) -> usize {
        self.text.insert_str(pos, s);
        pos + s.len()
    }

    /// Remove the char before `pos`. Returns the new position, or `None` at the start.
    pub fn delete_before(&mut self, pos: usize) -> Option<usize> {
        let prev = self.prev_boundary(pos)?;
        self.text.drain(prev..pos);
        Some(prev)
    }

    /// Remove the char at `pos`. Returns `false` at the end of the text.
    pub fn delete_at(&mut self, pos: usize) -> bool {
        match self.next_boundary(pos) {
            Some(next) => {
                self.text.drain(pos..next);
                true
            }
            None => false,
        }
    }

    pub fn prev_boundary(&self, pos: usize) -> Option<usize> {
        self.text[..pos].char_indices().next_back().map(|(i, _)| i)
    }

    pub fn next_boundary(&self, pos: usize) -> Option<usize> {
        self.text[pos..].chars().next().map(|c| pos + c.len_utf8())
    }

    /// Start of the logical line containing `pos`.
    pub fn line_start(&self, pos: usize) -> usize {
        self.text[..pos].rfind('\n').map_or(0, |i| i + 1)
    }

    /// End of the logical line containing `pos` (before its newline).
    pub fn line_end(&self, pos: usize) -> usize {
        self.text[pos..]
            .find('\n')
            .map_or(self.text.len(), |i| pos + i)
    }
}
