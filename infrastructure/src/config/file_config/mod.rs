//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod council;
mod openrouter;
mod output;
mod search;
mod storage;
mod title;

pub use council::{FileCouncilConfig, FileModeCouncilConfig};
pub use openrouter::FileOpenRouterConfig;
pub use output::FileOutputConfig;
pub use search::FileSearchConfig;
pub use storage::{FileLoggingConfig, FileStorageConfig};
pub use title::FileTitleConfig;

use council_application::{CouncilConfig, ModeCouncil};
use council_domain::{ConfigIssue, ConfigIssueCode, CouncilMode, ModelId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Council membership per mode
    pub council: FileCouncilConfig,
    /// Conversation title generation
    pub title: FileTitleConfig,
    /// OpenRouter connection
    pub openrouter: FileOpenRouterConfig,
    /// Web search for chat mode
    pub search: FileSearchConfig,
    /// Conversation storage
    pub storage: FileStorageConfig,
    /// Transcript logging
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Errors mark values that are ignored in favour of built-in defaults.
    /// Warnings mark values that were interpreted leniently.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.council.validate();

        if let Some(model) = &self.title.model
            && model.trim().is_empty()
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModelName {
                    field: "title.model".to_string(),
                },
                "title.model: model name cannot be empty".to_string(),
            ));
        }

        for (field, secs) in [
            ("openrouter.timeout_secs", self.openrouter.timeout_secs),
            ("title.timeout_secs", self.title.timeout_secs),
        ] {
            if secs == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroTimeout {
                        field: field.to_string(),
                    },
                    format!("{}: timeout must be greater than zero", field),
                ));
            }
        }

        issues
    }

    /// Mode used when no `--mode` flag is given.
    pub fn default_mode(&self) -> CouncilMode {
        self.council.parse_default_mode().0
    }

    /// Build the run configuration, keeping built-in defaults for any
    /// value that is unset or invalid.
    pub fn to_council_config(&self) -> CouncilConfig {
        let mut config = CouncilConfig::default();

        for mode in CouncilMode::ALL {
            let file = self.council.mode(mode);
            let builtin = config.council(mode).clone();

            let models = match &file.models {
                Some(models) if !models.is_empty() && models.iter().all(|m| !m.trim().is_empty()) => {
                    models.iter().map(|m| ModelId::new(m.trim())).collect()
                }
                _ => builtin.models,
            };
            let chairman = match &file.chairman {
                Some(chairman) if !chairman.trim().is_empty() => chairman.trim().into(),
                _ => builtin.chairman,
            };

            config = config.with_council(mode, ModeCouncil { models, chairman });
        }

        if let Some(model) = &self.title.model
            && !model.trim().is_empty()
        {
            config = config.with_title_model(model.trim());
        }
        if self.openrouter.timeout_secs > 0 {
            config = config.with_query_timeout(Duration::from_secs(self.openrouter.timeout_secs));
        }
        if self.title.timeout_secs > 0 {
            config = config.with_title_timeout(Duration::from_secs(self.title.timeout_secs));
        }

        config
    }
}
