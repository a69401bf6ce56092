//! Conversation title settings from TOML (`[title]` section)

use serde::{Deserialize, Serialize};

/// Raw title generation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTitleConfig {
    /// Model used for titles; built-in default when unset
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for FileTitleConfig {
    fn default() -> Self {
        Self {
            model: None,
            timeout_secs: 30,
        }
    }
}
