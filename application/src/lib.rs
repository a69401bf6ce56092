//! Application layer for llm-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CouncilConfig, CouncilConfigError, ModeCouncil, ResolvedCouncil};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    conversation_store::{ConversationStore, InMemoryConversationStore, StoreError},
    events::{
        ChannelEventSink, CouncilEvent, CouncilEventSink, NoEvents, StageTwoMetadata, TitlePayload,
    },
    llm_gateway::{GatewayError, LlmGateway, ModelReply, QueryOptions},
    progress::{NoProgress, ProgressNotifier},
    search::{NoSearch, SearchContextPort},
};
pub use use_cases::fan_out::{FanOutResult, query_all, query_all_with_progress};
pub use use_cases::generate_title::GenerateTitleUseCase;
pub use use_cases::run_council::{RunCouncilError, RunCouncilInput, RunCouncilUseCase};
pub use use_cases::send_message::{
    SendMessageError, SendMessageInput, SendMessageOutput, SendMessageUseCase,
};
