//! Scripted gateway shared by the use case tests.

use crate::ports::llm_gateway::{GatewayError, LlmGateway, ModelReply, QueryOptions};
use async_trait::async_trait;
use council_domain::{ChatMessage, ModelId};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

type Responder =
    Box<dyn Fn(&ModelId, &[ChatMessage]) -> Result<ModelReply, GatewayError> + Send + Sync>;

/// A request the gateway received
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: ModelId,
    pub messages: Vec<ChatMessage>,
    pub options: QueryOptions,
}

impl RecordedCall {
    pub fn last_content(&self) -> &str {
        self.messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Gateway answering every request through a closure
pub struct ScriptedGateway {
    responder: Responder,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGateway {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ModelId, &[ChatMessage]) -> Result<ModelReply, GatewayError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Delay replies from `model`
    pub fn with_delay(mut self, model: &str, delay: Duration) -> Self {
        self.delays.insert(model.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, model: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.model.as_str() == model)
            .collect()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn query(
        &self,
        model: &ModelId,
        messages: &[ChatMessage],
        options: &QueryOptions,
    ) -> Result<ModelReply, GatewayError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.clone(),
            messages: messages.to_vec(),
            options: options.clone(),
        });
        if let Some(delay) = self.delays.get(model.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        (self.responder)(model, messages)
    }
}

/// True when `messages` is a Stage 2 ranking request
pub fn is_ranking_request(messages: &[ChatMessage]) -> bool {
    messages
        .last()
        .is_some_and(|m| m.content.starts_with("You are evaluating different responses"))
}

/// True when `messages` is a title request
pub fn is_title_request(messages: &[ChatMessage]) -> bool {
    messages
        .last()
        .is_some_and(|m| m.content.starts_with("Generate a very short title"))
}
