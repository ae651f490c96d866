//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::sync::mpsc::Sender;

use crate::channel::{ChannelError, ChatChannel};
use crate::core::message::{Message, MessageEvent, OutgoingMessage, Serial};

/// A channel that records sends and never delivers anything.
#[derive(Default)]
pub struct RecordingChannel {
    pub sent: Mutex<Vec<OutgoingMessage>>,
    pub fail: bool,
}

#[async_trait]
impl ChatChannel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), ChannelError> {
        self.sent.lock().unwrap().push(message);
        if self.fail {
            Err(ChannelError::Rejected("recording channel set to fail".to_string()))
        } else {
            Ok(())
        }
    }

    fn subscribe(&self, _listener: Sender<MessageEvent>) -> Result<(), ChannelError> {
        Ok(())
    }
}

/// Builds a message with a fixed timestamp.
pub fn message(serial: &str, client_id: Option<&str>, text: &str) -> Message {
    Message {
        serial: Serial::new(serial),
        client_id: client_id.map(str::to_string),
        text: text.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
    }
}

/// Creates a test App attached to a RecordingChannel.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Some(Arc::new(RecordingChannel::default())))
}
