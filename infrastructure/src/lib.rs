//! Infrastructure layer for llm-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod openrouter;
pub mod search;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileCouncilConfig, FileLoggingConfig, FileModeCouncilConfig,
    FileOpenRouterConfig, FileOutputConfig, FileSearchConfig, FileStorageConfig, FileTitleConfig,
};
pub use logging::JsonlConversationLogger;
pub use openrouter::{
    DEFAULT_BASE_URL, ModelInfo, OpenRouterGateway, OpenRouterSettings, filter_models,
};
pub use search::{SearchError, TavilySearch};
pub use storage::{DEFAULT_DATA_DIR, JsonConversationStore};
