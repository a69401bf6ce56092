//! Council value objects - immutable result types for each stage.
//!
//! - [`StageOneResult`] - one model's answer from Stage 1
//! - [`StageTwoResult`] - one model's ranking of the anonymized answers
//! - [`AggregateEntry`] - a model's average position across all rankings
//! - [`StageThreeResult`] - the chairman's final answer
//! - [`CouncilRun`] - everything produced by one run

use super::label::LabelToModel;
use super::mode::CouncilMode;
use crate::core::model::ModelId;
use serde::{Deserialize, Serialize};

/// Response shown when the chairman cannot be reached.
pub const SYNTHESIS_FAILED_RESPONSE: &str = "Error: Unable to generate final synthesis.";

/// Response shown when no council model answered in Stage 1.
pub const ALL_MODELS_FAILED_RESPONSE: &str = "All models failed to respond. Please try again.";

/// Stage 1 answer from a model that responded successfully
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOneResult {
    pub model: ModelId,
    pub response: String,
    /// Data-URIs of generated images, in the order the model returned them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl StageOneResult {
    pub fn new(model: ModelId, response: impl Into<String>) -> Self {
        Self {
            model,
            response: response.into(),
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }
}

/// Stage 2 verdict from one rater
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTwoResult {
    pub model: ModelId,
    /// Full critique text as returned by the model
    pub ranking: String,
    /// Labels extracted from `ranking`, best first; may be partial or empty
    pub parsed_ranking: Vec<String>,
}

/// A model's standing across all parsed rankings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateEntry {
    pub model: ModelId,
    /// Mean 1-indexed position, rounded to two decimals
    pub average_rank: f64,
    /// Number of positions that contributed to the mean (always ≥ 1)
    pub rankings_count: usize,
}

/// The chairman's final answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageThreeResult {
    pub model: ModelId,
    pub response: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl StageThreeResult {
    pub fn new(model: ModelId, response: impl Into<String>) -> Self {
        Self {
            model,
            response: response.into(),
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    /// Sentinel returned when the chairman request fails.
    pub fn error_fallback(chairman: ModelId) -> Self {
        Self::new(chairman, SYNTHESIS_FAILED_RESPONSE)
    }

    /// Payload returned when Stage 1 produced no answers at all.
    pub fn all_models_failed() -> Self {
        Self::new(ModelId::from("error"), ALL_MODELS_FAILED_RESPONSE)
    }

    pub fn is_synthesis_failure(&self) -> bool {
        self.response == SYNTHESIS_FAILED_RESPONSE
    }
}

/// Run-level metadata assembled after Stage 3
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilMetadata {
    pub label_to_model: LabelToModel,
    pub aggregate_rankings: Vec<AggregateEntry>,
    pub web_search_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_context: Option<String>,
    pub mode: CouncilMode,
    pub council_models: Vec<ModelId>,
    pub chairman_model: ModelId,
}

/// Complete result of one council run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilRun {
    pub question: String,
    pub stage1: Vec<StageOneResult>,
    pub stage2: Vec<StageTwoResult>,
    pub stage3: StageThreeResult,
    /// `None` when the run aborted after an empty Stage 1
    pub metadata: Option<CouncilMetadata>,
}

impl CouncilRun {
    pub fn new(
        question: impl Into<String>,
        stage1: Vec<StageOneResult>,
        stage2: Vec<StageTwoResult>,
        stage3: StageThreeResult,
        metadata: CouncilMetadata,
    ) -> Self {
        Self {
            question: question.into(),
            stage1,
            stage2,
            stage3,
            metadata: Some(metadata),
        }
    }

    /// Run that stopped because every Stage 1 request failed.
    pub fn failed(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            stage1: Vec::new(),
            stage2: Vec::new(),
            stage3: StageThreeResult::all_models_failed(),
            metadata: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.metadata.is_none()
    }

    /// Aggregate ranking, empty for failed runs.
    pub fn aggregate_rankings(&self) -> &[AggregateEntry] {
        match &self.metadata {
            Some(metadata) => &metadata.aggregate_rankings,
            None => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_images_omitted_when_empty() {
        let result = StageOneResult::new(ModelId::from("m/a"), "hello");
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("images").is_none());

        let with = result.with_images(vec!["data:image/png;base64,AAA".to_string()]);
        let json = serde_json::to_value(&with).unwrap();
        assert_eq!(json["images"][0], "data:image/png;base64,AAA");
    }

    #[test]
    fn test_failed_run_shape() {
        let run = CouncilRun::failed("Why?");
        assert!(run.is_failed());
        assert!(run.stage1.is_empty());
        assert!(run.stage2.is_empty());
        assert_eq!(run.stage3.model.as_str(), "error");
        assert_eq!(run.stage3.response, ALL_MODELS_FAILED_RESPONSE);
        assert!(run.aggregate_rankings().is_empty());
    }

    #[test]
    fn test_error_fallback_sentinel() {
        let result = StageThreeResult::error_fallback(ModelId::from("m/chair"));
        assert_eq!(result.model.as_str(), "m/chair");
        assert!(result.is_synthesis_failure());
    }
}
