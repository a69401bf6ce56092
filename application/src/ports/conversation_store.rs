//! Conversation store port
//!
//! Persistence for conversations and their messages. Adapters live in the
//! infrastructure layer; an in-memory store is provided for tests and
//! one-shot runs.

use council_domain::{
    Conversation, ConversationMessage, ConversationSummary, StageOneResult, StageThreeResult,
    StageTwoResult,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Errors raised by a conversation store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Conversation {0} not found")]
    NotFound(String),

    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Corrupt conversation file {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

/// Repository of conversations
pub trait ConversationStore: Send + Sync {
    /// Create and persist an empty conversation under a fresh id.
    fn create(&self) -> Result<Conversation, StoreError>;

    /// Load a conversation, `Ok(None)` when it does not exist.
    fn get(&self, id: &str) -> Result<Option<Conversation>, StoreError>;

    /// Metadata of every conversation, newest first.
    fn list(&self) -> Result<Vec<ConversationSummary>, StoreError>;

    fn add_user_message(&self, id: &str, content: &str) -> Result<(), StoreError>;

    fn add_assistant_message(
        &self,
        id: &str,
        stage1: &[StageOneResult],
        stage2: &[StageTwoResult],
        stage3: &StageThreeResult,
    ) -> Result<(), StoreError>;

    fn update_title(&self, id: &str, title: &str) -> Result<(), StoreError>;
}

/// Process-local store backed by a map
#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: Mutex<HashMap<String, Conversation>>,
    next_id: AtomicU64,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn update<F>(&self, id: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Conversation),
    {
        let mut conversations = self
            .conversations
            .lock()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        let conversation = conversations
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        f(conversation);
        Ok(())
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn create(&self) -> Result<Conversation, StoreError> {
        let seq = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("conversation-{seq}");
        let conversation = Conversation::new(id.clone(), chrono::Utc::now().to_rfc3339());
        let mut conversations = self
            .conversations
            .lock()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        conversations.insert(id, conversation.clone());
        Ok(conversation)
    }

    fn get(&self, id: &str) -> Result<Option<Conversation>, StoreError> {
        let conversations = self
            .conversations
            .lock()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(conversations.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ConversationSummary>, StoreError> {
        let conversations = self
            .conversations
            .lock()
            .map_err(|e| StoreError::Io(e.to_string()))?;
        let mut summaries: Vec<_> = conversations.values().map(|c| c.summary()).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(summaries)
    }

    fn add_user_message(&self, id: &str, content: &str) -> Result<(), StoreError> {
        self.update(id, |c| {
            c.messages.push(ConversationMessage::User {
                content: content.to_string(),
            })
        })
    }

    fn add_assistant_message(
        &self,
        id: &str,
        stage1: &[StageOneResult],
        stage2: &[StageTwoResult],
        stage3: &StageThreeResult,
    ) -> Result<(), StoreError> {
        self.update(id, |c| {
            c.messages.push(ConversationMessage::Assistant {
                stage1: stage1.to_vec(),
                stage2: stage2.to_vec(),
                stage3: stage3.clone(),
            })
        })
    }

    fn update_title(&self, id: &str, title: &str) -> Result<(), StoreError> {
        self.update(id, |c| c.title = title.to_string())
    }
}
