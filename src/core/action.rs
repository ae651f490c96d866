//! # Actions
//!
//! Everything that can happen in the panel becomes an `Action`.
//! A message arrives? That's `Action::MessageReceived(message)`.
//! User presses Enter? That's `Action::Submit(draft)`.
//!
//! `update()` applies an action to the state and returns an `Effect` describing
//! the I/O the caller should perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, error, info};

use crate::core::message::{Message, OutgoingMessage};
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The channel delivered a message (possibly one we already have).
    MessageReceived(Message),
    /// The user submitted the draft. Carries the raw draft text.
    Submit(String),
    /// An in-flight send was accepted by the channel.
    SendSucceeded,
    /// An in-flight send failed. Carries the error description.
    SendFailed(String),
    Quit,
}

/// Side effects requested by `update`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Hand this message to the channel.
    Send(OutgoingMessage),
    /// The message list changed; bring the newest message into view.
    ScrollToNewest,
    /// Clear the draft and give the input focus back.
    ResetDraft,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::MessageReceived(message) => {
            let serial = message.serial.clone();
            if app.messages.insert(message).changed() {
                debug!("Inserted {} ({} messages)", serial, app.messages.len());
                Effect::ScrollToNewest
            } else {
                debug!("Ignored redelivery of {}", serial);
                Effect::None
            }
        }
        Action::Submit(draft) => {
            let text = draft.trim();
            if text.is_empty() || !app.can_send() {
                return Effect::None;
            }
            app.pending_sends += 1;
            app.status_message = "Sending...".to_string();
            info!("Submitting message ({} bytes)", text.len());
            Effect::Send(OutgoingMessage {
                text: text.to_string(),
            })
        }
        Action::SendSucceeded => {
            finish_send(app);
            Effect::ResetDraft
        }
        Action::SendFailed(err) => {
            finish_send(app);
            error!("Error sending message: {}", err);
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn finish_send(app: &mut App) {
    app.pending_sends = app.pending_sends.saturating_sub(1);
    if app.pending_sends == 0 {
        app.status_message.clear();
    }
}
