//! Shared test helpers for agent tests.

use async_trait::async_trait;
use cekfakta_core::error::{ProviderError, SearchError};
use cekfakta_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use cekfakta_tools::search::{SearchClient, SearchResult};
use std::sync::{Arc, Mutex};

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` returns the next response in the queue and
/// records the request. Panics if more calls are made than responses
/// provided, unless `failing_from` makes later calls fail instead.
pub struct SequentialMockProvider {
    responses: Vec<ProviderResponse>,
    fail_from: Option<usize>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses,
            fail_from: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn single_text(text: &str) -> Self {
        Self::new(vec![make_text_response(text)])
    }

    /// Fail every call from the `n`th (zero-based) on with an API error.
    pub fn failing_from(mut self, n: usize) -> Self {
        self.fail_from = Some(n);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let n = requests.len();
        requests.push(request);

        if self.fail_from.is_some_and(|from| n >= from) {
            return Err(ProviderError::ApiError {
                status_code: 503,
                message: "model overloaded".into(),
            });
        }

        match self.responses.get(n) {
            Some(r) => Ok(r.clone()),
            None => panic!(
                "SequentialMockProvider: no more responses (call #{n}, have {})",
                self.responses.len()
            ),
        }
    }
}

/// Create a simple text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        text: text.into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
        finish_reason: Some("STOP".into()),
    }
}

/// A model reply that calls the search tool.
pub fn action_text(query: &str) -> String {
    format!(
        "Thought: Do I need to use a tool? Yes\nAction: pencari_fakta_medis\nAction Input: {query}"
    )
}

pub fn result(title: &str, link: &str) -> SearchResult {
    SearchResult {
        title: title.into(),
        link: link.into(),
        snippet: format!("Ringkasan tentang {title}"),
    }
}

/// Scripted search backend that records its queries.
pub struct StubSearch {
    outcome: Result<Vec<SearchResult>, SearchError>,
    queries: Mutex<Vec<String>>,
}

impl StubSearch {
    pub fn with_results(results: Vec<SearchResult>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(results),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(SearchError::Api {
                status_code: 403,
                message: "quota exceeded".into(),
            }),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchClient for StubSearch {
    async fn try_search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.outcome.clone()
    }
}
