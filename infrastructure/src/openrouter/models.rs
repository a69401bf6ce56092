//! Model catalogue returned by `GET /models`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Substrings marking models that cannot serve a council
const EXCLUDED_MARKERS: [&str; 3] = ["embed", "moderation", "deprecated"];

#[derive(Deserialize)]
pub(super) struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}

/// One model offered by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub context_length: Option<u64>,
    /// Per-token prices as reported (OpenRouter sends decimal strings)
    #[serde(default)]
    pub pricing: Option<Value>,
}

impl ModelInfo {
    /// Name used for display and sorting; falls back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Drop embedding, moderation and deprecated models; sort by name.
pub fn filter_models(models: Vec<ModelInfo>) -> Vec<ModelInfo> {
    let mut models: Vec<_> = models
        .into_iter()
        .filter(|m| {
            let id = m.id.to_lowercase();
            !EXCLUDED_MARKERS.iter().any(|marker| id.contains(marker))
        })
        .collect();
    models.sort_by_key(|m| m.display_name().to_lowercase());
    models
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str, name: &str) -> ModelInfo {
        ModelInfo {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            context_length: None,
            pricing: None,
        }
    }

    #[test]
    fn test_filters_and_sorts() {
        let models = vec![
            model("openai/text-embedding-3", "Embedding"),
            model("x-ai/grok-4", "xAI: Grok 4"),
            model("openai/omni-moderation", "Moderation"),
            model("anthropic/claude-sonnet-4.5", "Anthropic: Claude Sonnet 4.5"),
            model("old/model-DEPRECATED", "Old"),
            model("google/gemini-3-pro-preview", ""),
        ];

        let ids: Vec<_> = filter_models(models).into_iter().map(|m| m.id).collect();
        assert_eq!(
            ids,
            vec![
                "anthropic/claude-sonnet-4.5",
                "google/gemini-3-pro-preview",
                "x-ai/grok-4",
            ]
        );
    }
}
