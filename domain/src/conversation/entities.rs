//! Conversation entities

use super::title::DEFAULT_TITLE;
use crate::council::value_objects::{StageOneResult, StageThreeResult, StageTwoResult};
use serde::{Deserialize, Serialize};

/// One entry of a conversation log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ConversationMessage {
    User {
        content: String,
    },
    Assistant {
        stage1: Vec<StageOneResult>,
        stage2: Vec<StageTwoResult>,
        stage3: StageThreeResult,
    },
}

/// A stored conversation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
}

impl Conversation {
    pub fn new(id: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: created_at.into(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            created_at: self.created_at.clone(),
            title: self.title.clone(),
            message_count: self.messages.len(),
        }
    }
}

/// List-view metadata for a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub created_at: String,
    pub title: String,
    pub message_count: usize,
}
