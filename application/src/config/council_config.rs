//! Council configuration.
//!
//! [`CouncilConfig`] is built once at start-up and passed to the use cases.
//! Per-request overrides are applied by [`CouncilConfig::resolve`], which
//! never mutates the configuration itself.

use crate::ports::llm_gateway::{DEFAULT_QUERY_TIMEOUT, TITLE_QUERY_TIMEOUT};
use council_domain::council::label::MAX_LABELS;
use council_domain::{CouncilMode, ModelId};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while resolving the council for a request
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CouncilConfigError {
    #[error("No council models configured for {0} mode")]
    NoModels(CouncilMode),

    #[error("Council has {count} models; at most {max} can be labelled")]
    TooManyModels { count: usize, max: usize },
}

/// Membership of one mode's council
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeCouncil {
    pub models: Vec<ModelId>,
    pub chairman: ModelId,
}

impl ModeCouncil {
    pub fn new<I, S>(models: I, chairman: impl Into<ModelId>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ModelId>,
    {
        Self {
            models: models.into_iter().map(Into::into).collect(),
            chairman: chairman.into(),
        }
    }
}

/// The council actually used for a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCouncil {
    pub mode: CouncilMode,
    pub models: Vec<ModelId>,
    pub chairman: ModelId,
}

/// Immutable run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouncilConfig {
    pub chat: ModeCouncil,
    pub code: ModeCouncil,
    pub image: ModeCouncil,
    /// Model used to title new conversations
    pub title_model: ModelId,
    pub query_timeout: Duration,
    pub title_timeout: Duration,
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self {
            chat: ModeCouncil::new(
                [
                    "openai/gpt-5.1",
                    "google/gemini-3-pro-preview",
                    "anthropic/claude-sonnet-4.5",
                    "x-ai/grok-4",
                ],
                "google/gemini-3-pro-preview",
            ),
            code: ModeCouncil::new(
                [
                    "anthropic/claude-sonnet-4.5",
                    "qwen/qwen3-coder",
                    "deepseek/deepseek-r1-distill-qwen-32b",
                    "openai/gpt-5.1",
                ],
                "anthropic/claude-sonnet-4.5",
            ),
            image: ModeCouncil::new(
                [
                    "openai/gpt-5-image",
                    "google/gemini-3-pro-image-preview",
                    "google/gemini-2.5-flash-image",
                    "qwen/qwen-vl-max",
                ],
                "google/gemini-3-pro-image-preview",
            ),
            title_model: ModelId::from("google/gemini-2.5-flash"),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            title_timeout: TITLE_QUERY_TIMEOUT,
        }
    }
}

impl CouncilConfig {
    /// Configured council for `mode`
    pub fn council(&self, mode: CouncilMode) -> &ModeCouncil {
        match mode {
            CouncilMode::Chat => &self.chat,
            CouncilMode::Code => &self.code,
            CouncilMode::Image => &self.image,
        }
    }

    /// Council for one request.
    ///
    /// A non-empty `custom_models` replaces the mode's members; `chairman`
    /// replaces the mode's chairman. Repeated ids collapse to their first
    /// occurrence.
    pub fn resolve(
        &self,
        mode: CouncilMode,
        custom_models: &[ModelId],
        chairman: Option<&ModelId>,
    ) -> Result<ResolvedCouncil, CouncilConfigError> {
        let base = self.council(mode);
        let requested: &[ModelId] = if custom_models.is_empty() {
            &base.models
        } else {
            custom_models
        };
        let mut models: Vec<ModelId> = Vec::with_capacity(requested.len());
        for model in requested {
            if !models.contains(model) {
                models.push(model.clone());
            }
        }

        if models.is_empty() {
            return Err(CouncilConfigError::NoModels(mode));
        }
        if models.len() > MAX_LABELS {
            return Err(CouncilConfigError::TooManyModels {
                count: models.len(),
                max: MAX_LABELS,
            });
        }

        Ok(ResolvedCouncil {
            mode,
            models,
            chairman: chairman.cloned().unwrap_or_else(|| base.chairman.clone()),
        })
    }

    // ==================== Builder Methods ====================

    pub fn with_council(mut self, mode: CouncilMode, council: ModeCouncil) -> Self {
        match mode {
            CouncilMode::Chat => self.chat = council,
            CouncilMode::Code => self.code = council,
            CouncilMode::Image => self.image = council,
        }
        self
    }

    pub fn with_title_model(mut self, model: impl Into<ModelId>) -> Self {
        self.title_model = model.into();
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    pub fn with_title_timeout(mut self, timeout: Duration) -> Self {
        self.title_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let config = CouncilConfig::default();
        assert_eq!(config.chat.models.len(), 4);
        assert_eq!(config.chat.chairman.as_str(), "google/gemini-3-pro-preview");
        assert_eq!(config.code.chairman.as_str(), "anthropic/claude-sonnet-4.5");
        assert_eq!(
            config.image.chairman.as_str(),
            "google/gemini-3-pro-image-preview"
        );
        assert_eq!(config.title_model.as_str(), "google/gemini-2.5-flash");
        assert_eq!(config.query_timeout, Duration::from_secs(120));
        assert_eq!(config.title_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_resolve_without_overrides_uses_mode_defaults() {
        let config = CouncilConfig::default();
        let resolved = config.resolve(CouncilMode::Code, &[], None).unwrap();
        assert_eq!(resolved.mode, CouncilMode::Code);
        assert_eq!(resolved.models, config.code.models);
        assert_eq!(resolved.chairman, config.code.chairman);
    }

    #[test]
    fn test_resolve_with_overrides() {
        let config = CouncilConfig::default();
        let custom = vec![ModelId::from("a/one"), ModelId::from("b/two")];
        let chairman = ModelId::from("c/chair");

        let resolved = config
            .resolve(CouncilMode::Chat, &custom, Some(&chairman))
            .unwrap();
        assert_eq!(resolved.models, custom);
        assert_eq!(resolved.chairman, chairman);
        // Configuration itself is untouched
        assert_eq!(config.chat.models.len(), 4);
    }

    #[test]
    fn test_resolve_collapses_repeated_models() {
        let config = CouncilConfig::default();
        let custom = vec![
            ModelId::from("m/x"),
            ModelId::from("m/y"),
            ModelId::from("m/x"),
        ];

        let resolved = config.resolve(CouncilMode::Chat, &custom, None).unwrap();
        assert_eq!(resolved.models, vec![ModelId::from("m/x"), ModelId::from("m/y")]);

        let config = config.with_council(
            CouncilMode::Code,
            ModeCouncil::new(["m/z", "m/z"], "m/z"),
        );
        let resolved = config.resolve(CouncilMode::Code, &[], None).unwrap();
        assert_eq!(resolved.models, vec![ModelId::from("m/z")]);
    }

    #[test]
    fn test_resolve_empty_council_is_error() {
        let config = CouncilConfig::default()
            .with_council(CouncilMode::Image, ModeCouncil::new(Vec::<String>::new(), "x"));
        assert_eq!(
            config.resolve(CouncilMode::Image, &[], None),
            Err(CouncilConfigError::NoModels(CouncilMode::Image))
        );
    }

    #[test]
    fn test_resolve_rejects_more_models_than_labels() {
        let config = CouncilConfig::default();
        let custom: Vec<ModelId> = (0..27).map(|i| ModelId::from(format!("m/{i}"))).collect();
        assert!(matches!(
            config.resolve(CouncilMode::Chat, &custom, None),
            Err(CouncilConfigError::TooManyModels { count: 27, max: 26 })
        ));
    }
}
