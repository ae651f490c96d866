//! Display rules for message authors.

use super::message::Message;

pub const DEFAULT_ANONYMOUS_LABEL: &str = "anonymous";
pub const DEFAULT_FEATURED_BADGE: &str = "OFFICIAL";

/// How authors are labelled. Resolved from config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appearance {
    /// Author whose messages get the accent border and badge.
    pub featured_author: Option<String>,
    pub featured_badge: String,
    /// Shown in place of a missing author.
    pub anonymous_label: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            featured_author: None,
            featured_badge: DEFAULT_FEATURED_BADGE.to_string(),
            anonymous_label: DEFAULT_ANONYMOUS_LABEL.to_string(),
        }
    }
}

impl Appearance {
    pub fn display_name<'a>(&'a self, message: &'a Message) -> &'a str {
        match message.client_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => &self.anonymous_label,
        }
    }

    /// Compares the displayed name, so an anonymous label never matches a
    /// featured author unless someone configured it that way.
    pub fn is_featured(&self, message: &Message) -> bool {
        self.featured_author
            .as_deref()
            .is_some_and(|featured| featured == self.display_name(message))
    }
}
