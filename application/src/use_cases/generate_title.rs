//! Generate Title use case
//!
//! Asks a fast model for a short conversation title.

use crate::ports::llm_gateway::{LlmGateway, QueryOptions};
use council_domain::{ChatMessage, DEFAULT_TITLE, ModelId, PromptTemplate, clean_title};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Use case for titling a conversation from its first message
pub struct GenerateTitleUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    model: ModelId,
    timeout: Duration,
}

impl<G: LlmGateway + 'static> Clone for GenerateTitleUseCase<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            model: self.model.clone(),
            timeout: self.timeout,
        }
    }
}

impl<G: LlmGateway + 'static> GenerateTitleUseCase<G> {
    pub fn new(gateway: Arc<G>, model: ModelId, timeout: Duration) -> Self {
        Self {
            gateway,
            model,
            timeout,
        }
    }

    /// Title for `question`; never fails.
    pub async fn execute(&self, question: &str) -> String {
        let messages = vec![ChatMessage::user(PromptTemplate::title_prompt(question))];
        let options = QueryOptions::new(self.timeout);

        match self.gateway.query(&self.model, &messages, &options).await {
            Ok(reply) => {
                let title = clean_title(&reply.content);
                debug!("Generated title: {}", title);
                title
            }
            Err(e) => {
                warn!("Title generation with {} failed: {}", self.model, e);
                DEFAULT_TITLE.to_string()
            }
        }
    }
}
