//! # Application State
//!
//! Core chat state. No TUI types live here. Presentation state (the draft
//! cursor, scroll offsets, focus) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── channel: Option<Arc<dyn ChatChannel>>  // send capability, None until attached
//! ├── messages: MessageList<Message>         // ordered, deduplicated history
//! ├── client_id: Option<String>              // who we are on the channel
//! ├── appearance: Appearance                 // author labelling rules
//! ├── pending_sends: usize                   // sends awaiting a result
//! └── status_message: String                 // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::channel::ChatChannel;
use crate::core::appearance::Appearance;
use crate::core::config::ResolvedConfig;
use crate::core::message::Message;
use crate::core::message_list::MessageList;

pub struct App {
    pub channel: Option<Arc<dyn ChatChannel>>,
    pub messages: MessageList<Message>,
    pub client_id: Option<String>,
    pub appearance: Appearance,
    pub pending_sends: usize,
    pub status_message: String,
}

impl App {
    pub fn new(channel: Option<Arc<dyn ChatChannel>>) -> Self {
        Self {
            channel,
            messages: MessageList::new(),
            client_id: None,
            appearance: Appearance::default(),
            pending_sends: 0,
            status_message: String::new(),
        }
    }

    pub fn from_config(channel: Arc<dyn ChatChannel>, config: &ResolvedConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            appearance: config.appearance.clone(),
            ..Self::new(Some(channel))
        }
    }

    pub fn can_send(&self) -> bool {
        self.channel.is_some()
    }

    pub fn is_sending(&self) -> bool {
        self.pending_sends > 0
    }
}
