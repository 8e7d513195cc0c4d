//! HTTP API v1.
//!
//! Endpoints:
//!
//! - `POST /v1/chat`          : Ask a question, get the answer
//! - `GET  /v1/sessions/{id}` : Read a session's turns

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cekfakta_agent::Source;
use cekfakta_core::message::Role;

use crate::SharedState;

/// Build the v1 API router. Nest this under "/v1" in the main router.
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/sessions/{id}", get(get_session_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChatRequest {
    /// Existing session ID (omit to start a new one).
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub answer: String,
    pub halted_by_iteration_limit: bool,
    pub tool_calls: usize,
    pub sources: Vec<Source>,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub turns: Vec<TurnDto>,
}

#[derive(Serialize)]
pub struct TurnDto {
    pub role: Role,
    pub text: String,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "message must not be empty"));
    }

    let (session_id, conversation) = state.session(payload.session_id).await;
    info!(session = %session_id, "v1/chat request");

    // Held for the whole turn: one question per session at a time.
    let mut conversation = conversation.lock().await;

    let outcome = state
        .checker
        .process_turn(&mut conversation, message)
        .await
        .map_err(|e| {
            warn!(session = %session_id, error = %e, "Turn failed");
            let status = match &e {
                cekfakta_core::Error::Provider(_) => StatusCode::BAD_GATEWAY,
                cekfakta_core::Error::Search(_) | cekfakta_core::Error::Config { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            api_error(status, format!("Agent error: {e}"))
        })?;

    Ok(Json(ChatResponse {
        session_id,
        answer: outcome.answer,
        halted_by_iteration_limit: outcome.halted_by_iteration_limit,
        tool_calls: outcome.tool_calls,
        sources: outcome.sources,
    }))
}

async fn get_session_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, StatusCode> {
    let conversation = state
        .existing_session(&id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    let conversation = conversation.lock().await;

    Ok(Json(SessionResponse {
        session_id: id,
        turns: conversation
            .turns()
            .iter()
            .map(|t| TurnDto {
                role: t.role,
                text: t.text.clone(),
                timestamp: t.timestamp.to_rfc3339(),
            })
            .collect(),
    }))
}
