//! Web search settings from TOML (`[search]` section)

use super::openrouter::resolve_secret;
use crate::search::DEFAULT_TAVILY_URL;
use serde::{Deserialize, Serialize};

/// Raw web search configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSearchConfig {
    /// Search chat questions that need current information
    pub enabled: bool,
    /// Environment variable holding the Tavily API key
    pub api_key_env: String,
    pub api_key: Option<String>,
    pub endpoint: String,
}

impl Default for FileSearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key_env: "TAVILY_API_KEY".to_string(),
            api_key: None,
            endpoint: DEFAULT_TAVILY_URL.to_string(),
        }
    }
}

impl FileSearchConfig {
    /// API key when search is enabled and a key is available.
    pub fn resolve_api_key(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        resolve_secret(self.api_key.as_deref(), &self.api_key_env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_search_has_no_key() {
        let config = FileSearchConfig {
            enabled: false,
            api_key: Some("tvly-key".to_string()),
            ..Default::default()
        };
        assert!(config.resolve_api_key().is_none());
    }
}
