//! JSON file conversation store.
//!
//! Each conversation lives in `<data_dir>/<id>.json`, pretty-printed. The
//! directory is created on first write.

use council_application::ports::conversation_store::{ConversationStore, StoreError};
use council_domain::{
    Conversation, ConversationMessage, ConversationSummary, StageOneResult, StageThreeResult,
    StageTwoResult,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default location of conversation files, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "data/conversations";

/// File-backed [`ConversationStore`]
pub struct JsonConversationStore {
    data_dir: PathBuf,
}

impl JsonConversationStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of a conversation file; ids that could escape the data directory are rejected.
    fn path_for(&self, id: &str) -> Result<PathBuf, StoreError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(self.data_dir.join(format!("{}.json", id)))
    }

    fn load(&self, path: &Path, id: &str) -> Result<Conversation, StoreError> {
        let raw = fs::read_to_string(path).map_err(|e| StoreError::Io(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    fn save(&self, conversation: &Conversation) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::Io(e.to_string()))?;
        let path = self.path_for(&conversation.id)?;
        let json = serde_json::to_string_pretty(conversation)
            .map_err(|e| StoreError::Io(e.to_string()))?;
        fs::write(&path, json).map_err(|e| StoreError::Io(e.to_string()))?;
        debug!("Saved conversation {} to {}", conversation.id, path.display());
        Ok(())
    }

    fn update<F>(&self, id: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Conversation),
    {
        let mut conversation = self
            .get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        f(&mut conversation);
        self.save(&conversation)
    }
}

impl ConversationStore for JsonConversationStore {
    fn create(&self) -> Result<Conversation, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let conversation = Conversation::new(id, chrono::Utc::now().to_rfc3339());
        self.save(&conversation)?;
        Ok(conversation)
    }

    fn get(&self, id: &str) -> Result<Option<Conversation>, StoreError> {
        let Ok(path) = self.path_for(id) else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        self.load(&path, id).map(Some)
    }

    fn list(&self) -> Result<Vec<ConversationSummary>, StoreError> {
        if !self.data_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.data_dir).map_err(|e| StoreError::Io(e.to_string()))?;
        let mut summaries = Vec::new();

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
                .to_string();
            match self.load(&path, &id) {
                Ok(conversation) => summaries.push(conversation.summary()),
                Err(e) => warn!("Skipping unreadable conversation file {}: {}", path.display(), e),
            }
        }

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
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

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{DEFAULT_TITLE, ModelId};

    #[test]
    fn test_create_writes_file_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("nested").join("conversations");
        let store = JsonConversationStore::new(&data_dir);
        assert!(!data_dir.exists());

        let conversation = store.create().unwrap();

        assert!(data_dir.join(format!("{}.json", conversation.id)).exists());
        assert_eq!(conversation.title, DEFAULT_TITLE);
        assert!(uuid::Uuid::parse_str(&conversation.id).is_ok());
    }

    #[test]
    fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConversationStore::new(dir.path());
        let id = store.create().unwrap().id;

        store.add_user_message(&id, "What is Rust?").unwrap();
        store
            .add_assistant_message(
                &id,
                &[StageOneResult::new(ModelId::from("m/a"), "A language")],
                &[StageTwoResult {
                    model: ModelId::from("m/a"),
                    ranking: "FINAL RANKING:\n1. Response A".to_string(),
                    parsed_ranking: vec!["Response A".to_string()],
                }],
                &StageThreeResult::new(ModelId::from("m/chair"), "Rust is a language"),
            )
            .unwrap();
        store.update_title(&id, "Rust Intro").unwrap();

        // A fresh store sees the same data
        let reopened = JsonConversationStore::new(dir.path());
        let conversation = reopened.get(&id).unwrap().unwrap();
        assert_eq!(conversation.title, "Rust Intro");
        assert_eq!(conversation.messages.len(), 2);

        let raw = fs::read_to_string(dir.path().join(format!("{}.json", id))).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][1]["stage3"]["model"], "m/chair");
    }

    #[test]
    fn test_get_missing_and_invalid_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConversationStore::new(dir.path());
        assert!(store.get("does-not-exist").unwrap().is_none());
        assert!(store.get("../etc/passwd").unwrap().is_none());
        assert!(matches!(
            store.add_user_message("missing", "hi"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_sorted_newest_first_and_skips_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConversationStore::new(dir.path());

        let mut older = Conversation::new("older", "2026-01-01T00:00:00+00:00");
        older.title = "Older".to_string();
        let newer = Conversation::new("newer", "2026-03-01T00:00:00+00:00");
        store.save(&older).unwrap();
        store.save(&newer).unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let ids: Vec<_> = store.list().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["newer", "older"]);
    }

    #[test]
    fn test_corrupt_file_is_reported_by_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConversationStore::new(dir.path());
        fs::write(dir.path().join("bad.json"), "[]").unwrap();

        assert!(matches!(
            store.get("bad"),
            Err(StoreError::Corrupt { id, .. }) if id == "bad"
        ));
    }

    #[test]
    fn test_list_without_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonConversationStore::new(dir.path().join("absent"));
        assert!(store.list().unwrap().is_empty());
    }
}
