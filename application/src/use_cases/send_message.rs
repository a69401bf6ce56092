//! Send Message use case
//!
//! Runs one council turn inside a stored conversation: records the user
//! message, titles new conversations, runs the three stages and stores the
//! assistant reply. Progress is reported as [`CouncilEvent`]s.

use crate::ports::conversation_store::{ConversationStore, StoreError};
use crate::ports::events::{CouncilEvent, CouncilEventSink, TitlePayload};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::generate_title::GenerateTitleUseCase;
use crate::use_cases::run_council::{RunCouncilError, RunCouncilInput, RunCouncilUseCase};
use council_domain::council::value_objects::ALL_MODELS_FAILED_RESPONSE;
use council_domain::{CouncilMode, CouncilRun, DEFAULT_TITLE, DomainError, ModelId, Question};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while processing a message
#[derive(Error, Debug)]
pub enum SendMessageError {
    #[error("Conversation {0} not found")]
    ConversationNotFound(String),

    #[error(transparent)]
    InvalidQuestion(#[from] DomainError),

    #[error(transparent)]
    Council(#[from] RunCouncilError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// A user message and its per-request council overrides
#[derive(Debug, Clone, Default)]
pub struct SendMessageInput {
    pub content: String,
    pub mode: CouncilMode,
    pub custom_models: Vec<ModelId>,
    pub chairman: Option<ModelId>,
}

impl SendMessageInput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: CouncilMode) -> Self {
        self.mode = mode;
        self
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

/// Result of one processed message
#[derive(Debug, Clone)]
pub struct SendMessageOutput {
    pub run: CouncilRun,
    /// Generated title when this was the conversation's first message
    pub title: Option<String>,
}

/// Use case for processing a message in a conversation
pub struct SendMessageUseCase<G: LlmGateway + 'static> {
    council: RunCouncilUseCase<G>,
    title: GenerateTitleUseCase<G>,
    store: Arc<dyn ConversationStore>,
}

impl<G: LlmGateway + 'static> SendMessageUseCase<G> {
    pub fn new(
        council: RunCouncilUseCase<G>,
        title: GenerateTitleUseCase<G>,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        Self {
            council,
            title,
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    /// Process `input` in conversation `conversation_id`.
    ///
    /// Events: `stage1_start` .. `stage3_complete`, then `title_complete` for
    /// a first message, then `complete`. A run whose council produced no
    /// answers is still stored and ends with `error`. Failures after the
    /// conversation was found are reported as `error` and returned.
    pub async fn execute(
        &self,
        conversation_id: &str,
        input: SendMessageInput,
        progress: &dyn ProgressNotifier,
        events: &dyn CouncilEventSink,
    ) -> Result<SendMessageOutput, SendMessageError> {
        let conversation = self
            .store
            .get(conversation_id)?
            .ok_or_else(|| SendMessageError::ConversationNotFound(conversation_id.to_string()))?;
        let is_first_message = conversation.is_empty();

        match self
            .process(conversation_id, is_first_message, input, progress, events)
            .await
        {
            Ok(output) => {
                if output.run.is_failed() {
                    events.emit(CouncilEvent::Error {
                        message: ALL_MODELS_FAILED_RESPONSE.to_string(),
                    });
                } else {
                    events.emit(CouncilEvent::Complete);
                }
                Ok(output)
            }
            Err(e) => {
                warn!("Message in conversation {} failed: {}", conversation_id, e);
                events.emit(CouncilEvent::Error {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn process(
        &self,
        conversation_id: &str,
        is_first_message: bool,
        input: SendMessageInput,
        progress: &dyn ProgressNotifier,
        events: &dyn CouncilEventSink,
    ) -> Result<SendMessageOutput, SendMessageError> {
        let question = Question::new(input.content.clone())?;
        self.council
            .config()
            .resolve(input.mode, &input.custom_models, input.chairman.as_ref())
            .map_err(RunCouncilError::from)?;

        self.store.add_user_message(conversation_id, &input.content)?;

        // Title generation overlaps the council run
        let title_task = is_first_message.then(|| {
            let title = self.title.clone();
            let content = input.content.clone();
            tokio::spawn(async move { title.execute(&content).await })
        });

        let council_input = RunCouncilInput::new(question, input.mode)
            .with_models(input.custom_models)
            .with_chairman(input.chairman);
        let run = self
            .council
            .execute_observed(council_input, progress, events)
            .await?;

        let title = match title_task {
            Some(task) => {
                let title = task.await.unwrap_or_else(|e| {
                    warn!("Title task failed: {}", e);
                    DEFAULT_TITLE.to_string()
                });
                self.store.update_title(conversation_id, &title)?;
                events.emit(CouncilEvent::TitleComplete {
                    data: TitlePayload {
                        title: title.clone(),
                    },
                });
                Some(title)
            }
            None => None,
        };

        self.store
            .add_assistant_message(conversation_id, &run.stage1, &run.stage2, &run.stage3)?;
        info!("Stored council reply in conversation {}", conversation_id);

        Ok(SendMessageOutput { run, title })
    }
}
