//! Web search client backed by the Google Custom Search JSON API.
//!
//! Results are normalized to `{title, link, snippet}` and capped at
//! [`MAX_SEARCH_RESULTS`]. Two entry points exist:
//!
//! - [`SearchClient::try_search`] returns a typed `Result`.
//! - [`SearchClient::search`] never fails: a provider or network failure
//!   becomes a single [`SearchHit::Error`] entry holding a readable message.
//!   Callers detect failure by the first entry not being a result. The agent
//!   loop consumes this form, since it reasons over text, not error types.

use async_trait::async_trait;
use cekfakta_config::{AppConfig, MAX_SEARCH_RESULTS};
use cekfakta_core::error::SearchError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Prefix of the message substituted for results when a search fails.
pub const SEARCH_ERROR_PREFIX: &str = "Terjadi error saat pencarian";

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// A single normalized search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

/// One entry of a soft-failing search: either a result or the error text
/// that replaced all results.
///
/// Serializes untagged, so a result is a JSON object and an error is a bare
/// JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchHit {
    Result(SearchResult),
    Error(String),
}

impl SearchHit {
    pub fn as_result(&self) -> Option<&SearchResult> {
        match self {
            Self::Result(r) => Some(r),
            Self::Error(_) => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// A search query and what came back for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub query: String,
    pub results: Vec<SearchHit>,
}

/// A keyed web-search backend.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Run one query and return at most [`MAX_SEARCH_RESULTS`] results.
    async fn try_search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError>;

    /// Run one query, folding any failure into a one-element error list.
    async fn search(&self, query: &str) -> Vec<SearchHit> {
        match self.try_search(query).await {
            Ok(results) => results
                .into_iter()
                .take(MAX_SEARCH_RESULTS as usize)
                .map(SearchHit::Result)
                .collect(),
            Err(e) => {
                warn!(query, error = %e, "Search failed, returning error entry");
                vec![SearchHit::Error(format!("{SEARCH_ERROR_PREFIX}: {e}"))]
            }
        }
    }
}

/// Google Custom Search JSON API client.
pub struct GoogleSearchClient {
    base_url: String,
    api_key: String,
    engine_id: String,
    num_results: u32,
    client: reqwest::Client,
}

impl GoogleSearchClient {
    /// Create a client for the given key and search engine id (`cx`).
    pub fn new(
        api_key: impl Into<String>,
        engine_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            num_results: MAX_SEARCH_RESULTS,
            client,
        })
    }

    /// Build from configuration, failing if credentials are missing.
    pub fn from_config(config: &AppConfig) -> Result<Self, SearchError> {
        let (key, cx) = config
            .require_search_credentials()
            .map_err(|e| SearchError::NotConfigured(e.to_string()))?;

        Ok(Self::new(key, cx, Duration::from_secs(config.search.timeout_secs))?
            .with_base_url(&config.search.api_url)
            .with_num_results(config.search.num_results))
    }

    /// Use a custom base URL (e.g., for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Request fewer results per query. Clamped to `1..=5`.
    pub fn with_num_results(mut self, n: u32) -> Self {
        self.num_results = n.clamp(1, MAX_SEARCH_RESULTS);
        self
    }

    fn normalize(items: Vec<ApiItem>, limit: usize) -> Vec<SearchResult> {
        items
            .into_iter()
            .filter_map(|item| {
                let title = item.title.filter(|t| !t.trim().is_empty())?;
                let link = item.link.filter(|l| !l.trim().is_empty())?;
                Some(SearchResult {
                    title,
                    link,
                    snippet: item.snippet.unwrap_or_default(),
                })
            })
            .take(limit)
            .collect()
    }
}

#[async_trait]
impl SearchClient for GoogleSearchClient {
    async fn try_search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let url = format!("{}/customsearch/v1", self.base_url);
        let num = self.num_results.to_string();

        debug!(query, num = self.num_results, "Sending custom search request");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|env| env.error.message)
                .unwrap_or(body);
            return Err(SearchError::Api {
                status_code: status,
                message,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Decode(e.to_string()))?;

        let results = Self::normalize(
            api_response.items.unwrap_or_default(),
            self.num_results as usize,
        );
        debug!(query, count = results.len(), "Search completed");
        Ok(results)
    }
}

// --- Custom Search API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    items: Option<Vec<ApiItem>>,
}

#[derive(Debug, Deserialize)]
struct ApiItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}
