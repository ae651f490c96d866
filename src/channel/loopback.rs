//! In-process chat channel.
//!
//! Everything sent is stamped with a serial and echoed back to every
//! subscriber after `echo_delay`, the same way a hosted channel echoes a
//! client's own messages. Used by the binary and by tests.
//!
//! Serials look like `0001718000000123-000007@<connection>`: zero-padded
//! milliseconds, then a per-channel sequence number, so they sort in send order
//! even within one millisecond.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::mpsc::Sender;

use super::{ChannelError, ChatChannel};
use crate::core::message::{Message, MessageEvent, OutgoingMessage, Serial};

pub const DEFAULT_ECHO_DELAY_MS: u64 = 150;

/// Knobs for the loopback channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopbackSettings {
    /// Author stamped on outgoing messages.
    pub client_id: Option<String>,
    pub echo_delay: Duration,
    /// Reject every send.
    pub fail_sends: bool,
    /// Deliver every message twice.
    pub redeliver: bool,
}

impl Default for LoopbackSettings {
    fn default() -> Self {
        Self {
            client_id: None,
            echo_delay: Duration::from_millis(DEFAULT_ECHO_DELAY_MS),
            fail_sends: false,
            redeliver: false,
        }
    }
}

type Subscribers = Arc<Mutex<Vec<Sender<MessageEvent>>>>;

pub struct LoopbackChannel {
    settings: LoopbackSettings,
    connection_id: String,
    sequence: AtomicU64,
    subscribers: Subscribers,
}

impl LoopbackChannel {
    pub fn new(settings: LoopbackSettings) -> Self {
        let connection_id = uuid::Uuid::new_v4().simple().to_string()[..10].to_string();
        info!(
            "Loopback channel {} created (client_id={:?}, echo_delay={:?})",
            connection_id, settings.client_id, settings.echo_delay
        );
        Self {
            settings,
            connection_id,
            sequence: AtomicU64::new(0),
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Next serial for this connection. Monotonic across calls.
    pub fn next_serial(&self) -> Serial {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let millis = Utc::now().timestamp_millis();
        Serial::new(format!("{millis:016}-{seq:06}@{}", self.connection_id))
    }

    /// Hand `message` to every subscriber, as if some client had published it.
    pub async fn deliver(&self, message: Message) {
        deliver_to(&self.subscribers, message, self.settings.redeliver).await;
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

async fn deliver_to(subscribers: &Subscribers, message: Message, redeliver: bool) {
    // Clone the senders out so the lock isn't held across an await
    let targets: Vec<Sender<MessageEvent>> = {
        let mut subs = subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subs.retain(|s| !s.is_closed());
        subs.clone()
    };

    let copies = if redeliver { 2 } else { 1 };
    debug!(
        "Delivering {} to {} subscriber(s) x{}",
        message.serial,
        targets.len(),
        copies
    );

    for target in targets {
        for _ in 0..copies {
            let event = MessageEvent {
                message: message.clone(),
            };
            if target.send(event).await.is_err() {
                warn!("Dropping delivery of {}: receiver dropped", message.serial);
                break;
            }
        }
    }
}

#[async_trait]
impl ChatChannel for LoopbackChannel {
    fn name(&self) -> &str {
        "loopback"
    }

    async fn send(&self, outgoing: OutgoingMessage) -> Result<(), ChannelError> {
        if self.settings.fail_sends {
            return Err(ChannelError::Rejected(
                "loopback channel is configured to reject sends".to_string(),
            ));
        }

        let message = Message {
            serial: self.next_serial(),
            client_id: self.settings.client_id.clone(),
            text: outgoing.text,
            timestamp: Utc::now(),
        };
        debug!("Accepted {} ({} bytes)", message.serial, message.text.len());

        let subscribers = Arc::clone(&self.subscribers);
        let delay = self.settings.echo_delay;
        let redeliver = self.settings.redeliver;
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            deliver_to(&subscribers, message, redeliver).await;
        });

        Ok(())
    }

    fn subscribe(&self, listener: Sender<MessageEvent>) -> Result<(), ChannelError> {
        if listener.is_closed() {
            return Err(ChannelError::ChannelClosed);
        }
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
        Ok(())
    }
}
