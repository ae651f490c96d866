//! # Message List
//!
//! Ordered, deduplicated history of inbound messages.
//!
//! Channels make no at-most-once or in-order promise, so every arrival goes
//! through [`MessageList::insert`]:
//!
//! ```text
//! incoming ──► already present? ──yes──► ignored (Duplicate)
//!                    │ no
//!                    ▼
//!          first existing item that is_after(incoming)
//!                    │
//!          found ────┴──── not found
//!            │                 │
//!     insert before it      append
//! ```
//!
//! Linear scans keep this simple. Histories here are display-sized.

use super::message::Sequenced;

/// Outcome of inserting an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// Message was new and now lives at this index.
    Inserted(usize),
    /// An equal message was already present; the list is unchanged.
    Duplicate,
}

impl Insertion {
    pub fn changed(self) -> bool {
        matches!(self, Insertion::Inserted(_))
    }
}

/// Messages in channel order with no duplicates.
#[derive(Debug, Clone)]
pub struct MessageList<M> {
    items: Vec<M>,
}

impl<M> Default for MessageList<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> MessageList<M> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, M> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[M] {
        &self.items
    }

    pub fn last(&self) -> Option<&M> {
        self.items.last()
    }
}

impl<M: Sequenced> MessageList<M> {
    /// Insert `message` at its ordered position unless it is already present.
    pub fn insert(&mut self, message: M) -> Insertion {
        if self.items.iter().any(|existing| existing.is_same_as(&message)) {
            return Insertion::Duplicate;
        }

        match self.items.iter().position(|existing| existing.is_after(&message)) {
            Some(index) => {
                self.items.insert(index, message);
                Insertion::Inserted(index)
            }
            None => {
                self.items.push(message);
                Insertion::Inserted(self.items.len() - 1)
            }
        }
    }
}

impl<'a, M> IntoIterator for &'a MessageList<M> {
    type Item = &'a M;
    type IntoIter = std::slice::Iter<'a, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
