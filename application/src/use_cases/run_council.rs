//! Run Council use case
//!
//! Orchestrates the three-stage council flow: independent answers, anonymized
//! peer ranking, and chairman synthesis.

use crate::config::{CouncilConfig, CouncilConfigError, ResolvedCouncil};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::events::{CouncilEvent, CouncilEventSink, NoEvents, StageTwoMetadata};
use crate::ports::llm_gateway::{LlmGateway, QueryOptions};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::search::{NoSearch, SearchContextPort};
use crate::use_cases::fan_out::query_all_with_progress;
use council_domain::{
    ChatMessage, CouncilMetadata, CouncilMode, CouncilRun, LabelToModel, ModelId, PromptTemplate,
    Question, Stage, StageOneResult, StageThreeResult, StageTwoResult,
    calculate_aggregate_rankings, parse_ranking_from_text,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur before a council run starts
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RunCouncilError {
    #[error("No council models configured for {0} mode")]
    NoModels(CouncilMode),

    #[error("Council has {count} models; at most {max} can be labelled")]
    TooManyModels { count: usize, max: usize },
}

impl From<CouncilConfigError> for RunCouncilError {
    fn from(err: CouncilConfigError) -> Self {
        match err {
            CouncilConfigError::NoModels(mode) => RunCouncilError::NoModels(mode),
            CouncilConfigError::TooManyModels { count, max } => {
                RunCouncilError::TooManyModels { count, max }
            }
        }
    }
}

/// Input for the RunCouncil use case
#[derive(Debug, Clone)]
pub struct RunCouncilInput {
    pub question: Question,
    pub mode: CouncilMode,
    /// Replaces the mode's council when non-empty
    pub custom_models: Vec<ModelId>,
    /// Replaces the mode's chairman
    pub chairman: Option<ModelId>,
}

impl RunCouncilInput {
    pub fn new(question: Question, mode: CouncilMode) -> Self {
        Self {
            question,
            mode,
            custom_models: Vec::new(),
            chairman: None,
        }
    }

    pub fn with_models(mut self, models: Vec<ModelId>) -> Self {
        self.custom_models = models;
        self
    }

    pub fn with_chairman(mut self, chairman: Option<ModelId>) -> Self {
        self.chairman = chairman;
        self
    }
}

/// Use case for running a council deliberation
pub struct RunCouncilUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    config: Arc<CouncilConfig>,
    search: Arc<dyn SearchContextPort>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> Clone for RunCouncilUseCase<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            config: Arc::clone(&self.config),
            search: Arc::clone(&self.search),
            conversation_logger: Arc::clone(&self.conversation_logger),
        }
    }
}

impl<G: LlmGateway + 'static> RunCouncilUseCase<G> {
    pub fn new(gateway: Arc<G>, config: Arc<CouncilConfig>) -> Self {
        Self {
            gateway,
            config,
            search: Arc::new(NoSearch),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_search(mut self, search: Arc<dyn SearchContextPort>) -> Self {
        self.search = search;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn config(&self) -> &CouncilConfig {
        &self.config
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunCouncilInput) -> Result<CouncilRun, RunCouncilError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilRun, RunCouncilError> {
        self.execute_observed(input, progress, &NoEvents).await
    }

    /// Execute the use case, emitting stage events to `events`.
    ///
    /// Emits `stage1_start` through `stage3_complete`. A run whose Stage 1
    /// produced no answers stops after `stage1_complete` and returns
    /// [`CouncilRun::failed`].
    pub async fn execute_observed(
        &self,
        input: RunCouncilInput,
        progress: &dyn ProgressNotifier,
        events: &dyn CouncilEventSink,
    ) -> Result<CouncilRun, RunCouncilError> {
        let council = self.config.resolve(
            input.mode,
            &input.custom_models,
            input.chairman.as_ref(),
        )?;
        let question = input.question.content();

        info!(
            "Starting {} council with {} models (chairman: {})",
            council.mode,
            council.models.len(),
            council.chairman
        );

        let search_context = self.fetch_search_context(council.mode, question).await;

        // Stage 1
        events.emit(CouncilEvent::Stage1Start { mode: council.mode });
        let stage1 = self
            .stage1_collect_responses(&council, question, search_context.as_deref(), progress)
            .await;
        events.emit(CouncilEvent::Stage1Complete {
            data: stage1.clone(),
        });

        if stage1.is_empty() {
            warn!("All council models failed in Stage 1; aborting run");
            self.conversation_logger.log(ConversationEvent::new(
                "council_aborted",
                serde_json::json!({
                    "mode": council.mode,
                    "models": council.models,
                }),
            ));
            return Ok(CouncilRun::failed(question));
        }

        // Stage 2
        events.emit(CouncilEvent::Stage2Start);
        let (stage2, label_to_model) = self
            .stage2_collect_rankings(&council, question, &stage1, progress)
            .await;
        let aggregate_rankings = calculate_aggregate_rankings(&stage2, &label_to_model);
        self.conversation_logger.log(ConversationEvent::new(
            "aggregate_rankings",
            serde_json::json!({ "rankings": aggregate_rankings }),
        ));
        events.emit(CouncilEvent::Stage2Complete {
            data: stage2.clone(),
            metadata: StageTwoMetadata {
                label_to_model: label_to_model.clone(),
                aggregate_rankings: aggregate_rankings.clone(),
                mode: council.mode,
            },
        });

        // Stage 3
        events.emit(CouncilEvent::Stage3Start);
        let stage3 = self
            .stage3_synthesize_final(&council, question, &stage1, &stage2, progress)
            .await;
        events.emit(CouncilEvent::Stage3Complete {
            data: stage3.clone(),
        });

        let metadata = CouncilMetadata {
            label_to_model,
            aggregate_rankings,
            web_search_used: search_context.is_some(),
            search_context,
            mode: council.mode,
            council_models: council.models,
            chairman_model: council.chairman,
        };

        Ok(CouncilRun::new(question, stage1, stage2, stage3, metadata))
    }

    /// Web search context for chat questions; other modes never search.
    pub async fn fetch_search_context(&self, mode: CouncilMode, question: &str) -> Option<String> {
        if !mode.uses_web_search() {
            return None;
        }
        let context = self.search.search_context(question).await;
        if let Some(context) = &context {
            debug!("Using web search context ({} bytes)", context.len());
        }
        context
    }

    /// Stage 1: every council model answers independently.
    ///
    /// Failed models are dropped; the result keeps council order.
    pub async fn stage1_collect_responses(
        &self,
        council: &ResolvedCouncil,
        question: &str,
        search_context: Option<&str>,
        progress: &dyn ProgressNotifier,
    ) -> Vec<StageOneResult> {
        info!("Stage 1: Collecting individual responses");
        progress.on_stage_start(Stage::One, council.models.len());

        let messages = PromptTemplate::stage_one_messages(council.mode, question, search_context);
        let options = QueryOptions::new(self.config.query_timeout)
            .with_image_generation(council.mode.enables_image_generation());

        let results = query_all_with_progress(
            &self.gateway,
            &council.models,
            &messages,
            &options,
            Stage::One,
            progress,
        )
        .await;

        let mut stage1 = Vec::with_capacity(results.len());
        for (model, result) in results {
            match result {
                Ok(reply) => {
                    stage1.push(StageOneResult::new(model, reply.content).with_images(reply.images))
                }
                Err(e) => self.log_failure(Stage::One, &model, &e.to_string()),
            }
        }

        info!(
            "Stage 1 complete: {}/{} models responded",
            stage1.len(),
            council.models.len()
        );
        self.conversation_logger.log(ConversationEvent::new(
            "stage1_complete",
            serde_json::json!({
                "responded": stage1.iter().map(|r| r.model.as_str()).collect::<Vec<_>>(),
                "council_size": council.models.len(),
            }),
        ));
        progress.on_stage_complete(Stage::One);
        stage1
    }

    /// Stage 2: every council model ranks the anonymized Stage 1 answers.
    ///
    /// Returns the rankings together with the label mapping they refer to.
    pub async fn stage2_collect_rankings(
        &self,
        council: &ResolvedCouncil,
        question: &str,
        stage1: &[StageOneResult],
        progress: &dyn ProgressNotifier,
    ) -> (Vec<StageTwoResult>, LabelToModel) {
        info!("Stage 2: Collecting peer rankings");
        progress.on_stage_start(Stage::Two, council.models.len());

        let label_to_model = LabelToModel::assign(stage1.iter().map(|r| &r.model));
        let prompt = PromptTemplate::ranking_prompt(council.mode, question, stage1, &label_to_model);
        debug!("Ranking prompt is {} bytes", prompt.len());

        let messages = vec![ChatMessage::user(prompt)];
        let options = QueryOptions::new(self.config.query_timeout);

        let results = query_all_with_progress(
            &self.gateway,
            &council.models,
            &messages,
            &options,
            Stage::Two,
            progress,
        )
        .await;

        let mut stage2 = Vec::with_capacity(results.len());
        for (model, result) in results {
            match result {
                Ok(reply) => {
                    let parsed_ranking = parse_ranking_from_text(&reply.content);
                    let unknown: Vec<_> = parsed_ranking
                        .iter()
                        .filter(|label| label_to_model.get(label).is_none())
                        .collect();
                    if !unknown.is_empty() {
                        debug!("Model {} ranked unknown labels {:?}", model, unknown);
                    }
                    stage2.push(StageTwoResult {
                        model,
                        ranking: reply.content,
                        parsed_ranking,
                    });
                }
                Err(e) => self.log_failure(Stage::Two, &model, &e.to_string()),
            }
        }

        info!(
            "Stage 2 complete: {}/{} rankings received",
            stage2.len(),
            council.models.len()
        );
        self.conversation_logger.log(ConversationEvent::new(
            "stage2_complete",
            serde_json::json!({
                "rankings": stage2.iter().map(|r| serde_json::json!({
                    "model": r.model,
                    "parsed_ranking": r.parsed_ranking,
                })).collect::<Vec<_>>(),
            }),
        ));
        progress.on_stage_complete(Stage::Two);
        (stage2, label_to_model)
    }

    /// Stage 3: the chairman synthesizes the final answer.
    ///
    /// A failed chairman request yields the fixed fallback answer.
    pub async fn stage3_synthesize_final(
        &self,
        council: &ResolvedCouncil,
        question: &str,
        stage1: &[StageOneResult],
        stage2: &[StageTwoResult],
        progress: &dyn ProgressNotifier,
    ) -> StageThreeResult {
        info!("Stage 3: Chairman {} synthesizing", council.chairman);
        progress.on_stage_start(Stage::Three, 1);

        let prompt = PromptTemplate::chairman_prompt(council.mode, question, stage1, stage2);
        debug!("Chairman prompt is {} bytes", prompt.len());

        let messages = vec![ChatMessage::user(prompt)];
        let options = QueryOptions::new(self.config.query_timeout)
            .with_image_generation(council.mode.enables_image_generation());

        let chairman = council.chairman.clone();
        let result = match self.gateway.query(&chairman, &messages, &options).await {
            Ok(reply) => {
                progress.on_task_complete(Stage::Three, &chairman, true);
                StageThreeResult::new(chairman, reply.content).with_images(reply.images)
            }
            Err(e) => {
                progress.on_task_complete(Stage::Three, &chairman, false);
                self.log_failure(Stage::Three, &chairman, &e.to_string());
                StageThreeResult::error_fallback(chairman)
            }
        };

        self.conversation_logger.log(ConversationEvent::new(
            "stage3_complete",
            serde_json::json!({
                "chairman": result.model,
                "fallback": result.is_synthesis_failure(),
                "bytes": result.response.len(),
                "images": result.images.len(),
            }),
        ));
        progress.on_stage_complete(Stage::Three);
        result
    }

    fn log_failure(&self, stage: Stage, model: &ModelId, error: &str) {
        warn!("{}: model {} failed: {}", stage.display_name(), model, error);
        self.conversation_logger.log(ConversationEvent::new(
            "model_query_failed",
            serde_json::json!({
                "stage": stage.as_str(),
                "model": model,
                "error": error,
            }),
        ));
    }
}
