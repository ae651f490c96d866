//! # Messages
//!
//! The message shape delivered by a chat channel, plus the comparison
//! capability the panel relies on for ordering and deduplication.
//!
//! Serials are opaque strings assigned by the channel. They sort
//! lexicographically in delivery order, so comparing two serials is enough to
//! answer both "is this the same message?" and "does this come later?".

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity and ordering over messages.
///
/// `MessageList` only needs these two relations, so it is generic over this
/// trait rather than tied to the concrete [`Message`] type.
pub trait Sequenced {
    /// True if both values describe the same message.
    fn is_same_as(&self, other: &Self) -> bool;
    /// True if `self` occurs strictly after `other` in the channel's order.
    fn is_after(&self, other: &Self) -> bool;
}

/// Channel-assigned message identifier. Ordered lexicographically.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Serial(String);

impl Serial {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chat message as delivered by the channel. Read-only for the panel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub serial: Serial,
    /// Author identifier. `None` for anonymous connections.
    pub client_id: Option<String>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Sequenced for Message {
    fn is_same_as(&self, other: &Self) -> bool {
        self.serial == other.serial
    }

    fn is_after(&self, other: &Self) -> bool {
        self.serial > other.serial
    }
}

/// Payload handed to `ChatChannel::send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
}

/// Event delivered to subscribers for every message on the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEvent {
    pub message: Message,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::message;

    #[test]
    fn same_serial_means_same_message() {
        let a = message("0001", Some("alice"), "hi");
        let b = message("0001", Some("bob"), "edited");
        assert!(a.is_same_as(&b));
        assert!(!a.is_after(&b));
        assert!(!b.is_after(&a));
    }

    #[test]
    fn later_serial_is_after() {
        let earlier = message("0001", None, "first");
        let later = message("0002", None, "second");
        assert!(later.is_after(&earlier));
        assert!(!earlier.is_after(&later));
        assert!(!earlier.is_same_as(&later));
    }

    #[test]
    fn serials_compare_lexicographically() {
        assert!(Serial::new("0000000000002-000001@a") > Serial::new("0000000000001-000009@b"));
        assert_eq!(Serial::new("x").to_string(), "x");
    }

    #[test]
    fn message_serializes_with_camel_case_fields() {
        let msg = message("0042", Some("alice"), "hello");
        let json = toml::Value::try_from(&msg).unwrap();
        let table = json.as_table().unwrap();
        assert_eq!(table["serial"].as_str(), Some("0042"));
        assert_eq!(table["clientId"].as_str(), Some("alice"));
        assert_eq!(table["text"].as_str(), Some("hello"));
    }
}
