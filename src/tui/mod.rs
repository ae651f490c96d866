//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the panel, and
//! translates keyboard and mouse events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Flow
//!
//! ```text
//! crossterm ──► TuiEvent ──► route_event ──► Action ──┐
//!                                                     ├──► update() ──► Effect ──► perform
//! channel subscription ──► Action::MessageReceived ───┤
//! send task ──► Action::SendSucceeded / SendFailed ───┘
//! ```
//!
//! Background tasks (sends, the subscription forwarder) report back through
//! an `mpsc` channel drained once per loop iteration, so every state change
//! happens on this thread.
//!
//! ## Redraw Strategy
//!
//! Draws only after events or background actions, except while the history
//! is easing toward the newest message, when it redraws every ~40ms.

mod component;
mod components;
mod event;
mod ui;

use log::{info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::channel::{ChannelError, ChatChannel, LoopbackChannel};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::message::{MessageEvent, OutgoingMessage};
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const ANIMATION_FRAME: Duration = Duration::from_millis(40);
const IDLE_POLL: Duration = Duration::from_millis(500);
/// Buffered inbound messages between the channel and the forwarder task
const SUBSCRIPTION_BUFFER: usize = 100;

/// Which part of the panel receives typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Text editing in the input box. Esc switches to History.
    Input,
    /// Browsing history. Typing switches back to Input.
    History,
}

/// TUI-specific presentation state (not part of core chat logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub focus: Focus,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            focus: Focus::Input, // User expects to type immediately
        }
    }

    /// Clear the draft and hand focus back to the input.
    pub fn reset_draft(&mut self) {
        self.input_box.reset();
        self.focus = Focus::Input;
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets us tell Shift+Enter from Enter.
        // Terminals without it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let channel: Arc<dyn ChatChannel> = Arc::new(LoopbackChannel::new(config.loopback.clone()));
    let mut app = App::from_config(Arc::clone(&channel), &config);
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    if let Err(e) = spawn_subscription(channel.as_ref(), tx.clone()) {
        warn!("Could not subscribe to {} channel: {}", channel.name(), e);
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Failed to enable terminal modes: {}", e))
        .ok();

    let mut needs_redraw = true; // Force first frame

    loop {
        tui.input_box.dimmed = tui.focus == Focus::History;

        let animating = tui.message_list.is_animating();
        if needs_redraw || animating {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if tui.message_list.is_animating() {
            ANIMATION_FRAME
        } else {
            IDLE_POLL
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            needs_redraw = true;
            if let Some(action) = route_event(&mut tui, event) {
                let effect = update(&mut app, action);
                should_quit |= perform(effect, &app, &mut tui, &tx);
            }
        }

        // Handle background task actions (inbound messages, send results)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            let effect = update(&mut app, action);
            should_quit |= perform(effect, &app, &mut tui, &tx);
        }

        if should_quit {
            break;
        }
    }

    info!("Shutting down with {} messages shown", app.messages.len());
    ratatui::restore();
    Ok(())
}

/// Route a terminal event to the focused component. Returns a core action if
/// the event means something beyond presentation.
fn route_event(tui: &mut TuiState, event: TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Resize => None,
        TuiEvent::Quit => Some(Action::Quit),

        // Scrolling works regardless of focus
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            None
        }

        // The Send button works regardless of focus
        TuiEvent::MouseClick(..) => submit_action(tui.input_box.handle_event(&event)),

        _ => match tui.focus {
            Focus::Input => {
                if event == TuiEvent::Escape {
                    tui.focus = Focus::History;
                    return None;
                }
                submit_action(tui.input_box.handle_event(&event))
            }
            Focus::History => {
                match event {
                    // Typing switches back to the input and lands there
                    TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                        tui.focus = Focus::Input;
                        tui.input_box.handle_event(&event);
                    }
                    TuiEvent::Submit => tui.focus = Focus::Input,
                    _ => {}
                }
                None
            }
        },
    }
}

fn submit_action(event: Option<InputEvent>) -> Option<Action> {
    match event? {
        InputEvent::Submit(draft) => Some(Action::Submit(draft)),
        InputEvent::ContentChanged => None,
    }
}

/// Carry out an effect returned by `update`. Returns true if the loop should quit.
fn perform(effect: Effect, app: &App, tui: &mut TuiState, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::None => {}
        Effect::Send(message) => match &app.channel {
            Some(channel) => spawn_send(Arc::clone(channel), message, tx.clone()),
            None => warn!("Send requested with no channel attached"),
        },
        Effect::ScrollToNewest => tui.message_list.scroll_to_newest(),
        Effect::ResetDraft => tui.reset_draft(),
        Effect::Quit => return true,
    }
    false
}

fn spawn_send(channel: Arc<dyn ChatChannel>, message: OutgoingMessage, tx: mpsc::Sender<Action>) {
    info!("Spawning send on {} channel", channel.name());
    tokio::spawn(async move {
        let action = match channel.send(message).await {
            Ok(()) => Action::SendSucceeded,
            Err(e) => Action::SendFailed(e.to_string()),
        };
        if tx.send(action).is_err() {
            warn!("Failed to report send result: receiver dropped");
        }
    });
}

/// Subscribe to `channel` and forward every delivery into the action channel.
fn spawn_subscription(
    channel: &dyn ChatChannel,
    tx: mpsc::Sender<Action>,
) -> Result<(), ChannelError> {
    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel::<MessageEvent>(SUBSCRIPTION_BUFFER);
    channel.subscribe(event_tx)?;
    info!("Subscribed to {} channel", channel.name());

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if tx.send(Action::MessageReceived(event.message)).is_err() {
                warn!("Failed to forward inbound message: receiver dropped");
                return;
            }
        }
        info!("Subscription closed");
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::LoopbackSettings;
    use crate::test_support::{RecordingChannel, test_app};

    fn type_text(tui: &mut TuiState, text: &str) {
        for c in text.chars() {
            assert_eq!(route_event(tui, TuiEvent::InputChar(c)), None);
        }
    }

    /// Route `event`, apply the resulting action, and perform its effect.
    fn dispatch(app: &mut App, tui: &mut TuiState, tx: &mpsc::Sender<Action>, event: TuiEvent) {
        if let Some(action) = route_event(tui, event) {
            let effect = update(app, action);
            perform(effect, app, tui, tx);
        }
    }

    /// Wait for one background action and apply it.
    fn settle(app: &mut App, tui: &mut TuiState, tx: &mpsc::Sender<Action>, rx: &mpsc::Receiver<Action>) -> Action {
        let action = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("background task should report back");
        let effect = update(app, action.clone());
        perform(effect, app, tui, tx);
        action
    }

    #[test]
    fn enter_submits_current_draft() {
        let mut tui = TuiState::new();
        type_text(&mut tui, "hello");
        assert_eq!(
            route_event(&mut tui, TuiEvent::Submit),
            Some(Action::Submit("hello".to_string()))
        );
    }

    #[test]
    fn newline_does_not_submit() {
        let mut tui = TuiState::new();
        type_text(&mut tui, "hi");
        // Shift+Enter arrives as a newline character
        assert_eq!(route_event(&mut tui, TuiEvent::InputChar('\n')), None);
        assert_eq!(tui.input_box.compose.text(), "hi\n");
    }

    #[test]
    fn escape_moves_focus_and_typing_brings_it_back() {
        let mut tui = TuiState::new();
        route_event(&mut tui, TuiEvent::Escape);
        assert_eq!(tui.focus, Focus::History);

        // Enter in history only refocuses the input
        assert_eq!(route_event(&mut tui, TuiEvent::Submit), None);
        assert_eq!(tui.focus, Focus::Input);

        route_event(&mut tui, TuiEvent::Escape);
        route_event(&mut tui, TuiEvent::InputChar('x'));
        assert_eq!(tui.focus, Focus::Input);
        assert_eq!(tui.input_box.compose.text(), "x");
    }

    #[test]
    fn quit_and_scroll_bypass_focus() {
        let mut tui = TuiState::new();
        route_event(&mut tui, TuiEvent::Escape);
        assert_eq!(route_event(&mut tui, TuiEvent::Quit), Some(Action::Quit));
        assert_eq!(route_event(&mut tui, TuiEvent::ScrollToBottom), None);
        assert!(tui.message_list.is_animating());
    }

    #[test]
    fn reset_draft_clears_and_refocuses() {
        let mut tui = TuiState::new();
        type_text(&mut tui, "hello");
        tui.focus = Focus::History;
        tui.reset_draft();
        assert_eq!(tui.input_box.compose.text(), "");
        assert_eq!(tui.focus, Focus::Input);
    }

    #[test]
    fn blank_draft_submission_sends_nothing() {
        let channel = Arc::new(RecordingChannel::default());
        let mut app = App::new(Some(channel.clone()));
        let mut tui = TuiState::new();
        let (tx, rx) = mpsc::channel();

        type_text(&mut tui, "   ");
        dispatch(&mut app, &mut tui, &tx, TuiEvent::Submit);

        assert!(!app.is_sending());
        assert!(rx.try_recv().is_err());
        assert!(channel.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn inbound_message_scrolls_to_newest() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (tx, _rx) = mpsc::channel();

        let effect = update(
            &mut app,
            Action::MessageReceived(crate::test_support::message("1", None, "hi")),
        );
        perform(effect, &app, &mut tui, &tx);
        assert!(tui.message_list.is_animating());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn successful_send_clears_draft_and_refocuses() {
        let channel = Arc::new(RecordingChannel::default());
        let mut app = App::new(Some(channel.clone()));
        let mut tui = TuiState::new();
        let (tx, rx) = mpsc::channel();

        type_text(&mut tui, "hello");
        dispatch(&mut app, &mut tui, &tx, TuiEvent::Submit);
        // Draft stays visible while the send is in flight
        assert_eq!(tui.input_box.compose.text(), "hello");
        tui.focus = Focus::History;

        assert_eq!(settle(&mut app, &mut tui, &tx, &rx), Action::SendSucceeded);
        assert_eq!(tui.input_box.compose.text(), "");
        assert_eq!(tui.focus, Focus::Input);
        assert_eq!(
            channel.sent.lock().unwrap().as_slice(),
            [OutgoingMessage { text: "hello".to_string() }]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn failed_send_keeps_draft() {
        let channel = Arc::new(RecordingChannel {
            fail: true,
            ..Default::default()
        });
        let mut app = App::new(Some(channel));
        let mut tui = TuiState::new();
        let (tx, rx) = mpsc::channel();

        type_text(&mut tui, "hello");
        dispatch(&mut app, &mut tui, &tx, TuiEvent::Submit);

        assert!(matches!(settle(&mut app, &mut tui, &tx, &rx), Action::SendFailed(_)));
        assert_eq!(tui.input_box.compose.text(), "hello");
        assert!(app.messages.is_empty());
        assert!(!app.is_sending());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn own_message_arrives_through_subscription() {
        let channel = Arc::new(LoopbackChannel::new(LoopbackSettings {
            client_id: Some("alice".to_string()),
            echo_delay: Duration::ZERO,
            ..Default::default()
        }));
        let mut app = App::new(Some(channel.clone()));
        let mut tui = TuiState::new();
        let (tx, rx) = mpsc::channel();
        spawn_subscription(channel.as_ref(), tx.clone()).unwrap();

        type_text(&mut tui, "hello");
        dispatch(&mut app, &mut tui, &tx, TuiEvent::Submit);

        // Send result and echo can land in either order
        let first = settle(&mut app, &mut tui, &tx, &rx);
        let second = settle(&mut app, &mut tui, &tx, &rx);
        assert!(matches!(first, Action::SendSucceeded | Action::MessageReceived(_)));
        assert!(matches!(second, Action::SendSucceeded | Action::MessageReceived(_)));

        assert_eq!(app.messages.len(), 1);
        let echoed = app.messages.last().unwrap();
        assert_eq!(echoed.text, "hello");
        assert_eq!(echoed.client_id.as_deref(), Some("alice"));
        assert_eq!(tui.input_box.compose.text(), "");
    }
}
