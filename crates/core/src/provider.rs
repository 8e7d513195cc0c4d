//! Provider trait: the abstraction over the hosted language model.
//!
//! A Provider knows how to send a system instruction plus a sequence of
//! turns to a model and get generated text back. The agent loop and the
//! fallback summarizer both talk to the model only through this trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::error::ProviderError;
use crate::message::ConversationTurn;

/// Configuration for a provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g., "gemini-2.5-flash")
    pub model: String,

    /// System instruction, sent separately from the turns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// The turns to send, oldest first
    pub messages: Vec<ConversationTurn>,

    /// Temperature (0.0 = deterministic)
    #[serde(default)]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Stop sequences
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

impl ProviderRequest {
    /// A single-prompt request with no system instruction.
    pub fn prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            messages: vec![ConversationTurn::user(prompt)],
            temperature: 0.0,
            max_tokens: None,
            stop: Vec::new(),
        }
    }
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated text
    pub text: String,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    /// Why generation stopped, as reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The core Provider trait.
///
/// The agent loop calls `complete()` without knowing which backend answers.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(&self, request: ProviderRequest) -> std::result::Result<ProviderResponse, ProviderError>;

    /// Health check: can we reach the provider?
    async fn health_check(&self) -> std::result::Result<bool, ProviderError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn prompt_request_is_single_user_turn() {
        let req = ProviderRequest::prompt("gemini-2.5-flash", "Apa itu kortisol?");
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, Role::User);
        assert!(req.system.is_none());
        assert!(req.temperature.abs() < f32::EPSILON);
    }

    #[test]
    fn request_serialization_skips_empty_fields() {
        let req = ProviderRequest::prompt("m", "hi");
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("stop"));
        assert!(!json.contains("system"));
        assert!(json.contains("\"model\":\"m\""));
    }
}
