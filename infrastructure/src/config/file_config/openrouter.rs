//! OpenRouter connection settings from TOML (`[openrouter]` section)

use crate::openrouter::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};

/// Raw OpenRouter configuration
///
/// # Example
///
/// ```toml
/// [openrouter]
/// api_key_env = "OPENROUTER_API_KEY"
/// base_url = "https://openrouter.ai/api/v1"
/// timeout_secs = 120
/// app_title = "LLM Council"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenRouterConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Inline API key; takes precedence over `api_key_env`
    pub api_key: Option<String>,
    pub base_url: String,
    /// Timeout for council queries
    pub timeout_secs: u64,
    pub referer: Option<String>,
    pub app_title: Option<String>,
}

impl Default for FileOpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 120,
            referer: None,
            app_title: None,
        }
    }
}

impl FileOpenRouterConfig {
    /// API key from the config file or the configured environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_secret(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// Non-empty inline value, else the non-empty value of `env_var`.
pub(crate) fn resolve_secret(inline: Option<&str>, env_var: &str) -> Option<String> {
    inline
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_key_wins() {
        let config = FileOpenRouterConfig {
            api_key: Some("sk-inline".to_string()),
            api_key_env: "LLM_COUNCIL_TEST_UNSET_VARIABLE".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-inline"));
    }

    #[test]
    fn test_missing_key() {
        let config = FileOpenRouterConfig {
            api_key_env: "LLM_COUNCIL_TEST_UNSET_VARIABLE".to_string(),
            ..Default::default()
        };
        assert!(config.resolve_api_key().is_none());
    }

    #[test]
    fn test_blank_inline_key_is_ignored() {
        assert!(resolve_secret(Some("  "), "LLM_COUNCIL_TEST_UNSET_VARIABLE").is_none());
    }
}
