//! One fact-checking turn, end to end.
//!
//! [`FactChecker::process_turn`] is what both surfaces call: it appends the
//! user turn, runs the ReAct loop, falls back to the summarizer when the loop
//! hits its cap, and appends the answer. If the model fails at any point, or
//! leaves the answer empty, the pending user turn is rolled back so the
//! conversation only ever holds completed exchanges.

use chrono::Utc;
use cekfakta_config::AppConfig;
use cekfakta_core::error::ProviderError;
use cekfakta_core::event::{DomainEvent, EventBus};
use cekfakta_core::message::{Conversation, ConversationTurn};
use cekfakta_core::provider::Provider;
use cekfakta_core::tool::ToolRegistry;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::fallback::FallbackSummarizer;
use crate::react::ReactAgent;
use crate::references::Source;
use crate::scratchpad::AgentStep;

/// What a completed turn produced.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// The text shown to the user: the final answer or the fallback summary.
    pub answer: String,
    pub halted_by_iteration_limit: bool,
    pub iterations: u32,
    pub tool_calls: usize,
    pub sources: Vec<Source>,
    pub steps: Vec<AgentStep>,
}

pub struct FactChecker {
    agent: ReactAgent,
    fallback: FallbackSummarizer,
    event_bus: Arc<EventBus>,
}

impl FactChecker {
    pub fn new(agent: ReactAgent, fallback: FallbackSummarizer, event_bus: Arc<EventBus>) -> Self {
        Self {
            agent,
            fallback,
            event_bus,
        }
    }

    /// Wire the loop and the summarizer to one provider using the model and
    /// agent settings from configuration.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let agent = ReactAgent::new(
            Arc::clone(&provider),
            &config.model.model,
            tools,
            Arc::clone(&event_bus),
        )
        .with_temperature(config.model.temperature)
        .with_max_tokens(config.model.max_output_tokens)
        .with_max_iterations(config.agent.max_iterations);

        let fallback = FallbackSummarizer::new(
            provider,
            &config.model.model,
            config.model.temperature,
            Arc::clone(&event_bus),
        );

        Self::new(agent, fallback, event_bus)
    }

    pub fn event_bus(&self) -> Arc<EventBus> {
        Arc::clone(&self.event_bus)
    }

    /// Answer one user message inside `conversation`.
    ///
    /// On success the conversation has grown by exactly two turns. On error
    /// it is left as it was before the call.
    pub async fn process_turn(
        &self,
        conversation: &mut Conversation,
        text: &str,
    ) -> Result<TurnOutcome, cekfakta_core::Error> {
        let history = conversation.turns().to_vec();
        conversation.push(ConversationTurn::user(text));

        let outcome = match self.answer(conversation, text, &history).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, conversation = %conversation.id, "Turn failed, rolling back user message");
                conversation.discard_unanswered();
                return Err(e);
            }
        };

        conversation.push(ConversationTurn::assistant(&outcome.answer));
        self.event_bus.publish(DomainEvent::TurnCompleted {
            conversation_id: conversation.id.to_string(),
            used_fallback: outcome.halted_by_iteration_limit,
            timestamp: Utc::now(),
        });
        info!(
            conversation = %conversation.id,
            turns = conversation.len(),
            fallback = outcome.halted_by_iteration_limit,
            "Turn completed"
        );

        Ok(outcome)
    }

    async fn answer(
        &self,
        conversation: &Conversation,
        text: &str,
        history: &[ConversationTurn],
    ) -> Result<TurnOutcome, cekfakta_core::Error> {
        let run = self.agent.run(text, history, &conversation.id).await?;
        let sources = run.sources();

        let answer = if run.halted_by_iteration_limit {
            self.fallback
                .summarize(text, &run.steps, &conversation.id)
                .await?
        } else {
            run.final_text
        };

        // An empty assistant turn would be replayed to the model on every
        // later request of the session.
        if answer.trim().is_empty() {
            return Err(ProviderError::EmptyResponse.into());
        }

        Ok(TurnOutcome {
            answer,
            halted_by_iteration_limit: run.halted_by_iteration_limit,
            iterations: run.iterations,
            tool_calls: run.tool_calls,
            sources,
            steps: run.steps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use cekfakta_core::message::Role;
    use cekfakta_tools::default_registry;

    fn checker(provider: Arc<SequentialMockProvider>, search: Arc<StubSearch>) -> FactChecker {
        FactChecker::from_config(
            &AppConfig::default(),
            provider,
            Arc::new(default_registry(search)),
            Arc::new(EventBus::default()),
        )
    }

    fn final_answer(text: &str) -> cekfakta_core::ProviderResponse {
        make_text_response(&format!("Thought: Do I need to use a tool? No\nFinal Answer: {text}"))
    }

    #[tokio::test]
    async fn turns_accumulate_in_order() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            final_answer("a1"),
            final_answer("a2"),
            final_answer("a3"),
        ]));
        let checker = checker(provider.clone(), StubSearch::with_results(vec![]));
        let mut conv = Conversation::new();

        for q in ["q1", "q2", "q3"] {
            checker.process_turn(&mut conv, q).await.unwrap();
        }

        assert_eq!(conv.len(), 6);
        let pairs: Vec<(Role, &str)> = conv
            .turns()
            .iter()
            .map(|t| (t.role, t.text.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                (Role::User, "q1"),
                (Role::Assistant, "a1"),
                (Role::User, "q2"),
                (Role::Assistant, "a2"),
                (Role::User, "q3"),
                (Role::Assistant, "a3"),
            ]
        );

        // Third request replays the first two exchanges before the question.
        let requests = provider.requests();
        let third = &requests[2].messages;
        assert_eq!(third.len(), 5);
        assert_eq!(third[4].text, "q3");
    }

    #[tokio::test]
    async fn halted_run_uses_fallback_once() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            make_text_response(&action_text("begadang")),
            make_text_response(&action_text("begadang efek")),
            make_text_response(&action_text("begadang jantung")),
            make_text_response("Rangkuman begadang.\n\nReferensi:\n1. A - https://a"),
        ]));
        let search = StubSearch::with_results(vec![
            result("A", "https://a"),
            result("B", "https://b"),
        ]);
        let checker = checker(provider.clone(), search.clone());
        let mut rx = checker.event_bus().subscribe();
        let mut conv = Conversation::new();

        let outcome = checker
            .process_turn(&mut conv, "efek samping begadang bagi kesehatan")
            .await
            .unwrap();

        assert!(outcome.halted_by_iteration_limit);
        assert_eq!(outcome.iterations, 3);
        assert_eq!(outcome.tool_calls, 3);
        assert_eq!(outcome.answer, "Rangkuman begadang.\n\nReferensi:\n1. A - https://a");
        assert_eq!(outcome.sources.len(), 2);
        assert_eq!(provider.call_count(), 4);
        assert_eq!(search.call_count(), 3);
        assert_eq!(conv.last().unwrap().text, outcome.answer);

        let mut fallbacks = 0;
        let mut completed = false;
        while let Ok(event) = rx.try_recv() {
            match event.as_ref() {
                DomainEvent::FallbackInvoked { .. } => fallbacks += 1,
                DomainEvent::TurnCompleted { used_fallback, .. } => {
                    assert!(used_fallback);
                    completed = true;
                }
                _ => {}
            }
        }
        assert_eq!(fallbacks, 1);
        assert!(completed);
    }

    #[tokio::test]
    async fn answered_run_skips_fallback() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            make_text_response(&action_text("kortisol")),
            final_answer("Kortisol adalah hormon stres.\n\nReferensi:\n1. A - https://a"),
        ]));
        let checker = checker(
            provider.clone(),
            StubSearch::with_results(vec![result("A", "https://a")]),
        );
        let mut conv = Conversation::new();

        let outcome = checker.process_turn(&mut conv, "apa itu kortisol?").await.unwrap();
        assert!(!outcome.halted_by_iteration_limit);
        assert_eq!(provider.call_count(), 2);
        assert_eq!(outcome.sources[0].link, "https://a");
    }

    #[tokio::test]
    async fn model_failure_rolls_back_user_turn() {
        let provider = Arc::new(
            SequentialMockProvider::new(vec![final_answer("a1")]).failing_from(1),
        );
        let checker = checker(provider, StubSearch::with_results(vec![]));
        let mut conv = Conversation::new();

        checker.process_turn(&mut conv, "q1").await.unwrap();
        let err = checker.process_turn(&mut conv, "q2").await.unwrap_err();

        assert!(matches!(err, cekfakta_core::Error::Provider(_)));
        assert_eq!(conv.len(), 2);
        assert_eq!(conv.last().unwrap().role, Role::Assistant);
    }

    #[tokio::test]
    async fn fallback_failure_rolls_back_user_turn() {
        let provider = Arc::new(
            SequentialMockProvider::new(vec![
                make_text_response(&action_text("a")),
                make_text_response(&action_text("b")),
                make_text_response(&action_text("c")),
            ])
            .failing_from(3),
        );
        let checker = checker(provider.clone(), StubSearch::with_results(vec![]));
        let mut conv = Conversation::new();

        assert!(checker.process_turn(&mut conv, "q").await.is_err());
        assert!(conv.is_empty());
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn empty_final_answer_is_not_recorded() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            final_answer("a1"),
            make_text_response("Thought: Do I need to use a tool? No\nFinal Answer:   "),
            final_answer("a3"),
        ]));
        let checker = checker(provider.clone(), StubSearch::with_results(vec![]));
        let mut conv = Conversation::new();

        checker.process_turn(&mut conv, "q1").await.unwrap();
        let err = checker.process_turn(&mut conv, "q2").await.unwrap_err();
        assert!(matches!(
            err,
            cekfakta_core::Error::Provider(ProviderError::EmptyResponse)
        ));
        assert_eq!(conv.len(), 2);

        // The next turn replays only the completed exchange.
        checker.process_turn(&mut conv, "q3").await.unwrap();
        let requests = provider.requests();
        let third = &requests[2].messages;
        assert_eq!(third.len(), 3);
        assert!(third.iter().all(|t| !t.text.trim().is_empty()));
    }

    #[tokio::test]
    async fn empty_fallback_reply_rolls_back() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            make_text_response(&action_text("a")),
            make_text_response(&action_text("b")),
            make_text_response(&action_text("c")),
            make_text_response(""),
        ]));
        let checker = checker(provider.clone(), StubSearch::with_results(vec![]));
        let mut conv = Conversation::new();

        let err = checker.process_turn(&mut conv, "q").await.unwrap_err();
        assert!(matches!(
            err,
            cekfakta_core::Error::Provider(ProviderError::EmptyResponse)
        ));
        assert!(conv.is_empty());
        assert_eq!(provider.call_count(), 4);
    }
}
