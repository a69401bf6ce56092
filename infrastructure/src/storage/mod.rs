//! Conversation persistence
//!
//! Provides [`JsonConversationStore`], a one-file-per-conversation store that
//! implements the [`ConversationStore`](council_application::ConversationStore) port.

mod json_store;

pub use json_store::{DEFAULT_DATA_DIR, JsonConversationStore};
