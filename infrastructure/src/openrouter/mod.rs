//! OpenRouter adapter
//!
//! Implements the [`LlmGateway`](council_application::LlmGateway) port over
//! OpenRouter's OpenAI-compatible chat completions API.

pub mod content;
mod gateway;
mod models;

pub use gateway::{DEFAULT_BASE_URL, OpenRouterGateway, OpenRouterSettings};
pub use models::{ModelInfo, filter_models};
