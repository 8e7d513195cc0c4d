//! ReAct loop: Thought → Action → Observation until a Final Answer.
//!
//! Each cycle sends the system instruction, prior conversation turns and the
//! current question (with the scratchpad so far) to the model, then parses
//! the reply:
//!
//! - **Final Answer** ends the run.
//! - **Action** dispatches the input to the named tool through the registry
//!   and records the observation.
//! - **Unparseable output** or an **unknown tool** becomes an observation the
//!   model sees on the next cycle. Either still counts as a cycle.
//!
//! The run stops after `max_iterations` cycles without a final answer and
//! reports `halted_by_iteration_limit`. Producing an answer from that state
//! is the fallback summarizer's job, not the loop's.

use chrono::Utc;
use cekfakta_core::event::{DomainEvent, EventBus};
use cekfakta_core::message::{ConversationId, ConversationTurn};
use cekfakta_core::provider::{Provider, ProviderRequest};
use cekfakta_core::tool::ToolRegistry;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::parser::{self, AgentAction, AgentOutput, INVALID_FORMAT_ACTION};
use crate::prompt;
use crate::references::{self, Source};
use crate::scratchpad::{AgentStep, Scratchpad};

/// Default cycle cap.
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;

/// Stop sequence that keeps the model from writing its own observation.
pub const OBSERVATION_STOP: &str = "\nObservation:";

pub struct ReactAgent {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
    max_iterations: u32,
    event_bus: Arc<EventBus>,
}

/// The outcome of one run of the loop.
#[derive(Debug, Clone, Serialize)]
pub struct AgentRunResult {
    /// Final answer text. Empty when halted by the iteration limit.
    pub final_text: String,
    /// Every act/observe cycle, in order.
    pub steps: Vec<AgentStep>,
    /// True iff `max_iterations` cycles ran without a final answer.
    pub halted_by_iteration_limit: bool,
    /// Cycles used, including the one that produced the answer.
    pub iterations: u32,
    /// Cycles dispatched to a registered tool, whether or not the tool
    /// accepted the input. Format errors and unknown tools are not counted.
    pub tool_calls: usize,
}

impl AgentRunResult {
    /// Distinct sources seen across all observations.
    pub fn sources(&self) -> Vec<Source> {
        references::collect_sources(&self.steps)
    }
}

impl ReactAgent {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            tools,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            event_bus,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set max iterations.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the default max tokens per model response.
    pub fn with_max_tokens(mut self, max: Option<u32>) -> Self {
        self.max_tokens = max;
        self
    }

    /// Execute the loop for one question.
    ///
    /// `history` holds the completed turns before this question. A model
    /// failure aborts the run and is returned as-is.
    pub async fn run(
        &self,
        input: &str,
        history: &[ConversationTurn],
        conversation_id: &ConversationId,
    ) -> Result<AgentRunResult, cekfakta_core::Error> {
        let system = prompt::system_prompt(&self.tools);
        let mut pad = Scratchpad::new(self.max_iterations);
        let mut tool_calls = 0;

        info!(model = %self.model, max_iter = self.max_iterations, "ReAct loop starting");

        while pad.tick() {
            debug!(iteration = pad.iterations, "ReAct iteration");

            let mut messages = history.to_vec();
            messages.push(ConversationTurn::user(prompt::user_turn(
                input,
                &pad.render(),
            )));

            let request = ProviderRequest {
                model: self.model.clone(),
                system: Some(system.clone()),
                messages,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                stop: vec![OBSERVATION_STOP.into()],
            };

            let response = self.provider.complete(request).await?;

            if let Some(usage) = &response.usage {
                self.event_bus.publish(DomainEvent::ResponseGenerated {
                    conversation_id: conversation_id.to_string(),
                    model: response.model.clone(),
                    tokens_used: usage.total_tokens,
                    timestamp: Utc::now(),
                });
            }

            let action = match parser::parse(&response.text) {
                Ok(AgentOutput::Finish { answer, .. }) => {
                    if tool_calls > 0 && !references::has_reference_section(&answer)
                    {
                        warn!("Final answer used search results but has no reference section");
                    }
                    info!(
                        iterations = pad.iterations,
                        steps = pad.steps.len(),
                        "ReAct loop completed"
                    );
                    return Ok(AgentRunResult {
                        final_text: answer,
                        steps: pad.steps,
                        halted_by_iteration_limit: false,
                        iterations: pad.iterations,
                        tool_calls,
                    });
                }
                Ok(AgentOutput::Action(action)) => action,
                Err(e) => {
                    warn!(error = %e, "Model output did not follow the ReAct format");
                    pad.record(
                        AgentAction {
                            tool: INVALID_FORMAT_ACTION.into(),
                            tool_input: e.observation.clone(),
                            log: e.llm_output,
                        },
                        e.observation,
                    );
                    continue;
                }
            };

            let (observation, reached_tool) = self.dispatch(&action).await;
            if reached_tool {
                tool_calls += 1;
            }
            pad.record(action, observation);
        }

        warn!(max_iterations = self.max_iterations, "ReAct: max iterations reached");
        self.event_bus.publish(DomainEvent::IterationLimitReached {
            conversation_id: conversation_id.to_string(),
            iterations: pad.iterations,
            timestamp: Utc::now(),
        });

        Ok(AgentRunResult {
            final_text: String::new(),
            steps: pad.steps,
            halted_by_iteration_limit: true,
            iterations: pad.iterations,
            tool_calls,
        })
    }

    /// Run the chosen tool and turn whatever happens into observation text.
    ///
    /// The flag is false when no registered tool had that name.
    async fn dispatch(&self, action: &AgentAction) -> (String, bool) {
        if self.tools.get(&action.tool).is_none() {
            warn!(tool = %action.tool, "Model requested an unknown tool");
            let observation = format!(
                "{} is not a valid tool, try one of [{}].",
                action.tool,
                self.tools.names().join(", ")
            );
            return (observation, false);
        }

        let start = std::time::Instant::now();
        let result = self.tools.invoke(&action.tool, &action.tool_input).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let (success, observation) = match result {
            Ok(r) => (r.success, r.output),
            Err(e) => {
                warn!(tool = %action.tool, error = %e, "Tool invocation failed");
                (false, format!("Error: {e}"))
            }
        };

        self.event_bus.publish(DomainEvent::ToolExecuted {
            tool_name: action.tool.clone(),
            input: action.tool_input.clone(),
            success,
            duration_ms,
            timestamp: Utc::now(),
        });

        (observation, true)
    }
}
