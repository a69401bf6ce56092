//! Conversation domain
//!
//! A conversation is an append-only log of user questions and the council
//! runs that answered them.

pub mod entities;
pub mod title;

pub use entities::{Conversation, ConversationMessage, ConversationSummary};
pub use title::{DEFAULT_TITLE, clean_title};
