//! Chat message domain.
//!
//! - [`message::ChatMessage`] — a single `{role, content}` message sent to a model
//! - [`message::Role`] — the author of a message

pub mod message;

pub use message::{ChatMessage, Role};
