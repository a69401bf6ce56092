//! Web search adapters
//!
//! Provides [`TavilySearch`], which implements the
//! [`SearchContextPort`](council_application::SearchContextPort) for chat
//! questions that look like they need current information.

mod tavily;

pub use tavily::{
    DEFAULT_TAVILY_URL, SearchError, TavilyResponse, TavilyResult, TavilySearch,
    format_search_results, needs_web_search,
};
