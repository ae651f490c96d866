//! # Core Chat Logic
//!
//! The panel's state and rules. It knows nothing about any specific UI
//! technology or transport.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • App (state)          │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI.         │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │    TUI     │              │  Channel   │
//!           │  Adapter   │              │ (send +    │
//!           │ (ratatui)  │              │ subscribe) │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`message`]: `Message`, its serial, and the `Sequenced` comparison trait
//! - [`message_list`]: ordered, deduplicated message history
//! - [`compose`]: the draft being typed
//! - [`appearance`]: author labels and featured-author styling rules
//! - [`state`]: the `App` struct
//! - [`action`]: the `Action` enum and `update()` reducer
//! - [`config`]: TOML config loading and resolution

pub mod action;
pub mod appearance;
pub mod compose;
pub mod config;
pub mod message;
pub mod message_list;
pub mod state;
