//! Storage settings from TOML (`[storage]` and `[logging]` sections)

use serde::{Deserialize, Serialize};

/// Raw conversation storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory holding one JSON file per conversation
    pub data_dir: String,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data/conversations".to_string(),
        }
    }
}

/// Raw transcript logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of council events; disabled when unset
    pub transcript_path: Option<String>,
}
