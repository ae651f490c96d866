//! # Chat Channels
//!
//! The transport seam. A channel delivers every message on the conversation
//! to its subscribers and accepts outgoing messages. Ordering, persistence and
//! delivery guarantees are the channel's business. The panel only sorts and
//! deduplicates what it is handed.

pub mod loopback;

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::core::message::{MessageEvent, OutgoingMessage};

pub use loopback::{LoopbackChannel, LoopbackSettings};

/// Errors a channel may report.
#[derive(Debug)]
pub enum ChannelError {
    /// The channel refused the message.
    Rejected(String),
    /// A subscriber's receiver was dropped.
    ChannelClosed,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::Rejected(reason) => write!(f, "message rejected: {reason}"),
            ChannelError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for ChannelError {}

#[async_trait]
pub trait ChatChannel: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Publish a message. Resolves once the channel has accepted it.
    async fn send(&self, message: OutgoingMessage) -> Result<(), ChannelError>;

    /// Register a listener. Every message on the channel, including this
    /// client's own, is delivered to it. Redelivery and out-of-order
    /// delivery are allowed.
    fn subscribe(&self, listener: Sender<MessageEvent>) -> Result<(), ChannelError>;
}
