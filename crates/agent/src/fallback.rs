//! Fallback summarizer for runs that hit the iteration limit.
//!
//! Makes exactly one model call with the question, every recorded step and
//! the distinct sources found, asking for the best available answer plus the
//! reference section. No tools, no retry, no recursion.

use chrono::Utc;
use cekfakta_core::event::{DomainEvent, EventBus};
use cekfakta_core::message::ConversationId;
use cekfakta_core::provider::{Provider, ProviderRequest};
use std::sync::Arc;
use tracing::info;

use crate::prompt;
use crate::references;
use crate::scratchpad::{AgentStep, Scratchpad};

pub struct FallbackSummarizer {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    event_bus: Arc<EventBus>,
}

impl FallbackSummarizer {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            event_bus,
        }
    }

    /// Produce an answer from the partial research of a halted run.
    pub async fn summarize(
        &self,
        original_query: &str,
        steps: &[AgentStep],
        conversation_id: &ConversationId,
    ) -> Result<String, cekfakta_core::Error> {
        let sources = references::collect_sources(steps);
        info!(steps = steps.len(), sources = sources.len(), "Summarizing halted run");

        self.event_bus.publish(DomainEvent::FallbackInvoked {
            conversation_id: conversation_id.to_string(),
            steps: steps.len(),
            timestamp: Utc::now(),
        });

        let text = prompt::fallback_prompt(
            original_query,
            &Scratchpad::render_for_summary(steps),
            &sources,
        );
        let mut request = ProviderRequest::prompt(&self.model, text);
        request.temperature = self.temperature;

        let response = self.provider.complete(request).await?;
        Ok(response.text)
    }
}
