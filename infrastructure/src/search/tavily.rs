//! Tavily search API client.
//!
//! A query is only searched when it matches one of the current-information
//! patterns (time words, recency words, recent years, prices, news, ...).
//! Results are rendered as a markdown context block:
//!
//! - **Quick Answer** - Tavily's generated answer, when present
//! - **Web Search Results** - up to 5 numbered hits with source URLs

use async_trait::async_trait;
use council_application::ports::search::SearchContextPort;
use council_domain::util::truncate_chars;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Tavily search endpoint.
pub const DEFAULT_TAVILY_URL: &str = "https://api.tavily.com/search";

const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RESULTS: usize = 5;
const MAX_RESULT_CONTENT_CHARS: usize = 500;

static CURRENT_INFO_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(today|tonight|yesterday|this week|this month|this year)\b",
        r"\b(latest|recent|current|new|breaking|update)\b",
        r"\b(2024|2025|2026)\b",
        r"\b(price|cost|stock|weather|news|score|result)\b",
        r"\b(who is|what is the current|what happened)\b",
        r"\b(how much does|where can i buy|is .+ open)\b",
    ]
    .iter()
    .map(|pattern| Regex::new(&format!("(?i){}", pattern)).expect("valid regex"))
    .collect()
});

/// Errors from the Tavily API
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Tavily API key not configured")]
    NotConfigured,

    #[error("Search request failed: {0}")]
    Request(String),

    #[error("Search API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse search results: {0}")]
    InvalidResponse(String),
}

/// True when `query` looks like it needs current information.
pub fn needs_web_search(query: &str) -> bool {
    CURRENT_INFO_PATTERNS.iter().any(|re| re.is_match(query))
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    include_answer: bool,
    include_raw_content: bool,
    search_depth: &'static str,
}

/// Search response body
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TavilyResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<TavilyResult>,
}

/// One search hit
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TavilyResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Render search results as a context block for the council.
pub fn format_search_results(results: &TavilyResponse) -> String {
    let mut parts = Vec::new();

    if let Some(answer) = &results.answer
        && !answer.is_empty()
    {
        parts.push(format!("**Quick Answer:** {}", answer));
    }

    if !results.results.is_empty() {
        parts.push("\n**Web Search Results:**".to_string());
        for (i, result) in results.results.iter().take(MAX_RESULTS).enumerate() {
            let title = result.title.as_deref().unwrap_or("No title");
            let content = result.content.as_deref().unwrap_or_default();
            parts.push(format!("\n{}. **{}**", i + 1, title));
            parts.push(format!(
                "   {}",
                truncate_chars(content, MAX_RESULT_CONTENT_CHARS)
            ));
            if let Some(url) = &result.url
                && !url.is_empty()
            {
                parts.push(format!("   Source: {}", url));
            }
        }
    }

    parts.join("\n")
}

/// Tavily-backed [`SearchContextPort`]
///
/// Without an API key every lookup returns `None` without a request.
pub struct TavilySearch {
    client: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl TavilySearch {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            endpoint: DEFAULT_TAVILY_URL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Run a search, regardless of the heuristic.
    pub async fn search(&self, query: &str) -> Result<TavilyResponse, SearchError> {
        let api_key = self.api_key.as_deref().ok_or(SearchError::NotConfigured)?;

        let request = TavilyRequest {
            api_key,
            query,
            max_results: MAX_RESULTS,
            include_answer: true,
            include_raw_content: false,
            search_depth: "basic",
        };

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(SEARCH_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl SearchContextPort for TavilySearch {
    async fn search_context(&self, query: &str) -> Option<String> {
        if !self.is_configured() || !needs_web_search(query) {
            return None;
        }

        match self.search(query).await {
            Ok(results) => {
                let context = format_search_results(&results);
                debug!("Web search returned {} results", results.results.len());
                (!context.is_empty()).then_some(context)
            }
            Err(e) => {
                warn!("Web search failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_web_search() {
        assert!(needs_web_search("What's the weather in Paris today?"));
        assert!(needs_web_search("Latest Rust release"));
        assert!(needs_web_search("Best laptops of 2025"));
        assert!(needs_web_search("Who is the CEO of Mozilla?"));
        assert!(needs_web_search("Is the Louvre open on Mondays?"));
        assert!(needs_web_search("WHAT HAPPENED at the summit"));

        assert!(!needs_web_search("Explain ownership in Rust"));
        assert!(!needs_web_search("Write a haiku about autumn"));
        // Word boundaries
        assert!(!needs_web_search("Renewal of the lease"));
    }

    #[test]
    fn test_format_search_results() {
        let results = TavilyResponse {
            answer: Some("Sunny, 21C".to_string()),
            results: vec![
                TavilyResult {
                    title: Some("Paris forecast".to_string()),
                    content: Some("Clear skies all day.".to_string()),
                    url: Some("https://weather.example/paris".to_string()),
                },
                TavilyResult {
                    title: None,
                    content: Some("x".repeat(600)),
                    url: None,
                },
            ],
        };

        let text = format_search_results(&results);
        assert!(text.starts_with("**Quick Answer:** Sunny, 21C\n\n**Web Search Results:**"));
        assert!(text.contains("\n1. **Paris forecast**\n   Clear skies all day.\n   Source: https://weather.example/paris"));
        assert!(text.contains("\n2. **No title**\n   "));
        assert!(text.ends_with(&"x".repeat(500)));
        assert!(!text.contains(&"x".repeat(501)));
    }

    #[test]
    fn test_format_limits_to_five_results() {
        let results = TavilyResponse {
            answer: None,
            results: (0..8)
                .map(|i| TavilyResult {
                    title: Some(format!("hit {}", i)),
                    ..Default::default()
                })
                .collect(),
        };
        let text = format_search_results(&results);
        assert!(text.contains("5. **hit 4**"));
        assert!(!text.contains("hit 5"));
        assert!(!text.contains("Quick Answer"));
    }

    #[test]
    fn test_empty_results_format_to_empty_string() {
        assert_eq!(format_search_results(&TavilyResponse::default()), "");
    }

    #[tokio::test]
    async fn test_unconfigured_search_returns_none() {
        let search = TavilySearch::new(None);
        assert!(!search.is_configured());
        assert!(search.search_context("news today").await.is_none());
        assert!(matches!(
            search.search("news today").await,
            Err(SearchError::NotConfigured)
        ));
    }
}
