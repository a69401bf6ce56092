//! LLM Gateway port
//!
//! Defines the interface for issuing completion requests to hosted models.

use async_trait::async_trait;
use council_domain::{ChatMessage, ModelId};
use std::time::Duration;
use thiserror::Error;

/// Timeout for council content queries.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for conversation title generation.
pub const TITLE_QUERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur during LLM gateway operations
///
/// Every variant is a soft failure from the council's point of view: the
/// caller logs it and carries on without that model.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Query task failed: {0}")]
    TaskFailed(String),
}

/// Per-request settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    pub timeout: Duration,
    /// Ask for text and image output with a 1:1 aspect ratio
    pub enable_image_generation: bool,
}

impl QueryOptions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            enable_image_generation: false,
        }
    }

    pub fn with_image_generation(mut self, enabled: bool) -> Self {
        self.enable_image_generation = enabled;
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self::new(DEFAULT_QUERY_TIMEOUT)
    }
}

/// A successful completion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelReply {
    /// Text of the reply (text blocks joined when the provider returns blocks)
    pub content: String,
    /// Provider reasoning trace, passed through untouched
    pub reasoning_details: Option<serde_json::Value>,
    /// Data-URIs of images extracted from the reply
    pub images: Vec<String>,
}

impl ModelReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Issue a single completion request to `model`.
    async fn query(
        &self,
        model: &ModelId,
        messages: &[ChatMessage],
        options: &QueryOptions,
    ) -> Result<ModelReply, GatewayError>;
}
