//! HTTP chat gateway for Cek Fakta.
//!
//! Serves the embedded chat page plus a small JSON API. Every browser tab
//! gets its own session (conversation); turns within one session are
//! serialized by a per-session mutex while different sessions run
//! concurrently.
//!
//! Built on Axum.

pub mod api_v1;
pub mod frontend;

use axum::extract::DefaultBodyLimit;
use axum::{Router, response::Json, routing::get};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use cekfakta_agent::FactChecker;
use cekfakta_core::message::{Conversation, ConversationId};

/// Default number of in-memory sessions before the oldest is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 1_000;

struct SessionEntry {
    /// Creation order; the lowest is evicted first.
    seq: u64,
    conversation: Arc<Mutex<Conversation>>,
}

/// Shared application state for the gateway.
pub struct GatewayState {
    pub checker: Arc<FactChecker>,
    sessions: RwLock<HashMap<String, SessionEntry>>,
    next_seq: AtomicU64,
    max_sessions: usize,
}

pub type SharedState = Arc<GatewayState>;

impl GatewayState {
    pub fn new(checker: Arc<FactChecker>) -> Self {
        Self {
            checker,
            sessions: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }

    /// Cap the number of live sessions (at least one).
    pub fn with_max_sessions(mut self, max: usize) -> Self {
        self.max_sessions = max.max(1);
        self
    }

    /// Get the session with `id`, creating it if it does not exist yet.
    /// With no id a fresh session is created.
    pub async fn session(&self, id: Option<String>) -> (String, Arc<Mutex<Conversation>>) {
        let id = id.unwrap_or_else(|| ConversationId::new().to_string());
        let mut sessions = self.sessions.write().await;

        if sessions.len() >= self.max_sessions && !sessions.contains_key(&id) {
            if let Some(oldest_key) = sessions
                .iter()
                .min_by_key(|(_, s)| s.seq)
                .map(|(k, _)| k.clone())
            {
                info!(session = %oldest_key, "Evicting oldest session");
                sessions.remove(&oldest_key);
            }
        }

        let entry = sessions.entry(id.clone()).or_insert_with(|| SessionEntry {
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
            conversation: Arc::new(Mutex::new(Conversation::with_id(ConversationId::from(&id)))),
        });
        (id, Arc::clone(&entry.conversation))
    }

    /// Look up an existing session.
    pub async fn existing_session(&self, id: &str) -> Option<Arc<Mutex<Conversation>>> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|s| Arc::clone(&s.conversation))
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full router: chat page, health check and the v1 API.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(state))
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(
    config: &cekfakta_config::AppConfig,
    checker: Arc<FactChecker>,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let state = GatewayState::new(checker).with_max_sessions(config.gateway.max_sessions);
    let app = build_router(Arc::new(state));

    info!(addr = %addr, model = %config.model.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use cekfakta_agent::FactChecker;
    use cekfakta_config::AppConfig;
    use cekfakta_core::error::{ProviderError, SearchError};
    use cekfakta_core::event::EventBus;
    use cekfakta_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use cekfakta_tools::search::{SearchClient, SearchResult};
    use std::sync::Arc;

    /// Answers every request with the same text, or fails every request.
    pub struct FixedProvider {
        pub reply: Option<String>,
    }

    #[async_trait]
    impl Provider for FixedProvider {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            match &self.reply {
                Some(text) => Ok(ProviderResponse {
                    text: text.clone(),
                    usage: None,
                    model: "fixed".into(),
                    finish_reason: None,
                }),
                None => Err(ProviderError::Network("connection refused".into())),
            }
        }
    }

    pub struct NoSearch;

    #[async_trait]
    impl SearchClient for NoSearch {
        async fn try_search(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
            Ok(vec![])
        }
    }

    pub fn checker(reply: Option<&str>) -> Arc<FactChecker> {
        Arc::new(FactChecker::from_config(
            &AppConfig::default(),
            Arc::new(FixedProvider {
                reply: reply.map(str::to_string),
            }),
            Arc::new(cekfakta_tools::default_registry(Arc::new(NoSearch))),
            Arc::new(EventBus::default()),
        ))
    }
}
