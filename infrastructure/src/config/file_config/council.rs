//! Council membership from TOML (`[council]` section)

use council_domain::{ConfigIssue, ConfigIssueCode, CouncilMode};
use serde::{Deserialize, Serialize};

/// One mode's council from TOML
///
/// # Example
///
/// ```toml
/// [council.code]
/// models = ["anthropic/claude-sonnet-4.5", "qwen/qwen3-coder"]
/// chairman = "anthropic/claude-sonnet-4.5"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModeCouncilConfig {
    /// Council members; built-in list when unset
    pub models: Option<Vec<String>>,
    /// Chairman; built-in chairman when unset
    pub chairman: Option<String>,
}

impl FileModeCouncilConfig {
    fn validate(&self, mode: CouncilMode) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let section = format!("council.{}", mode);

        if let Some(models) = &self.models {
            if models.is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyCouncil {
                        mode: mode.to_string(),
                    },
                    format!("{}.models: council cannot be empty", section),
                ));
            }
            if models.iter().any(|m| m.trim().is_empty()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName {
                        field: format!("{}.models", section),
                    },
                    format!("{}.models: model name cannot be empty in list", section),
                ));
            }
        }

        if let Some(chairman) = &self.chairman
            && chairman.trim().is_empty()
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModelName {
                    field: format!("{}.chairman", section),
                },
                format!("{}.chairman: model name cannot be empty", section),
            ));
        }

        issues
    }
}

/// Raw `[council]` configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Mode used when none is given on the command line
    pub default_mode: String,
    pub chat: FileModeCouncilConfig,
    pub code: FileModeCouncilConfig,
    pub image: FileModeCouncilConfig,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            default_mode: CouncilMode::default().to_string(),
            chat: FileModeCouncilConfig::default(),
            code: FileModeCouncilConfig::default(),
            image: FileModeCouncilConfig::default(),
        }
    }
}

impl FileCouncilConfig {
    pub fn mode(&self, mode: CouncilMode) -> &FileModeCouncilConfig {
        match mode {
            CouncilMode::Chat => &self.chat,
            CouncilMode::Code => &self.code,
            CouncilMode::Image => &self.image,
        }
    }

    /// Parse `default_mode`, falling back to chat with a warning.
    pub fn parse_default_mode(&self) -> (CouncilMode, Vec<ConfigIssue>) {
        match self.default_mode.parse::<CouncilMode>() {
            Ok(mode) => (mode, Vec::new()),
            Err(_) => (
                CouncilMode::default(),
                vec![ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "council.default_mode".to_string(),
                        value: self.default_mode.clone(),
                        valid_values: CouncilMode::ALL.iter().map(|m| m.to_string()).collect(),
                    },
                    format!(
                        "council.default_mode: unknown mode '{}', falling back to 'chat'",
                        self.default_mode
                    ),
                )],
            ),
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_default_mode().1;
        for mode in CouncilMode::ALL {
            issues.extend(self.mode(mode).validate(mode));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::Severity;

    #[test]
    fn test_valid_by_default() {
        assert!(FileCouncilConfig::default().validate().is_empty());
    }

    #[test]
    fn test_empty_council_and_blank_names() {
        let mut config = FileCouncilConfig::default();
        config.code.models = Some(vec![]);
        config.image.models = Some(vec!["openai/gpt-5-image".to_string(), " ".to_string()]);
        config.chat.chairman = Some(String::new());

        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.severity == Severity::Error));
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::EmptyCouncil { mode } if mode == "code"
        )));
        assert!(issues.iter().any(|i| matches!(
            &i.code,
            ConfigIssueCode::EmptyModelName { field } if field == "council.chat.chairman"
        )));
    }

    #[test]
    fn test_unknown_default_mode_is_warning() {
        let config = FileCouncilConfig {
            default_mode: "poetry".to_string(),
            ..Default::default()
        };
        let (mode, issues) = config.parse_default_mode();
        assert_eq!(mode, CouncilMode::Chat);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }
}
