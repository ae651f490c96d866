//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: identity, message count and send status
//! - `MessageView`: a single chat message, with featured-author styling
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBox`: draft editor with a Send button
//! - `MessageList`: scrollable history with layout caching and smooth
//!   scroll-to-newest
//!
//! Each component file holds its state types, event types, rendering, event
//! handling and tests. Components receive external data as props (struct
//! fields) rather than reading the whole `App`.
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── message.rs       (Single message renderer)
//! ├── message_list.rs  (Scrollable message container)
//! └── input_box/       (Draft editor + Send button)
//! ```

pub mod input_box;
pub mod message;
pub mod message_list;
mod title_bar;

pub use input_box::{InputBox, InputEvent};
pub use message_list::{MessageList, MessageListState};
pub use title_bar::TitleBar;
