//! Search context port
//!
//! Supplies optional web search context that is embedded above a chat
//! question in Stage 1.

use async_trait::async_trait;

/// Source of web search context for a question
#[async_trait]
pub trait SearchContextPort: Send + Sync {
    /// Formatted context for `query`, or `None` when search is not needed or failed.
    async fn search_context(&self, query: &str) -> Option<String>;
}

/// Search provider that never returns context
pub struct NoSearch;

#[async_trait]
impl SearchContextPort for NoSearch {
    async fn search_context(&self, _query: &str) -> Option<String> {
        None
    }
}
