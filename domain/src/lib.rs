//! Domain layer for llm-council
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A council run is a single forward pass through three stages:
//!
//! - **Stage 1**: every council model answers the question independently
//! - **Stage 2**: every council model ranks the anonymized Stage 1 answers
//! - **Stage 3**: a chairman model synthesizes one final answer
//!
//! ## Modes
//!
//! - **Chat** (default): general question answering, optionally with web context
//! - **Code**: programming tasks judged on correctness and security
//! - **Image**: image generation requests with image output modalities

pub mod config;
pub mod conversation;
pub mod core;
pub mod council;
pub mod prompt;
pub mod session;
pub mod util;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use conversation::{
    Conversation, ConversationMessage, ConversationSummary, DEFAULT_TITLE, clean_title,
};
pub use core::{error::DomainError, model::ModelId, question::Question};
pub use council::{
    AggregateEntry, CouncilMetadata, CouncilMode, CouncilRun, Label, LabelToModel, Stage,
    StageOneResult, StageThreeResult, StageTwoResult, calculate_aggregate_rankings,
    parse_ranking_from_text,
};
pub use prompt::PromptTemplate;
pub use session::{ChatMessage, Role};
