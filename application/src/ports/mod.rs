//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod conversation_store;
pub mod events;
pub mod llm_gateway;
pub mod progress;
pub mod search;
