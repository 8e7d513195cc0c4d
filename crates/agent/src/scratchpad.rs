//! Scratchpad: the intermediate steps of a single agent run.
//!
//! Every cycle of the loop records the action the model chose and what came
//! back. The scratchpad is replayed to the model on the next cycle and handed
//! to the fallback summarizer when the loop gives up.

use serde::{Deserialize, Serialize};

use crate::parser::AgentAction;

/// One act/observe cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStep {
    pub action: AgentAction,
    pub observation: String,
}

/// Steps and the iteration counter for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scratchpad {
    pub steps: Vec<AgentStep>,
    pub iterations: u32,
    pub max_iterations: u32,
}

impl Scratchpad {
    pub fn new(max_iterations: u32) -> Self {
        Self {
            steps: Vec::new(),
            iterations: 0,
            max_iterations,
        }
    }

    /// Count one cycle. Returns `false` once the cap is used up.
    pub fn tick(&mut self) -> bool {
        if self.iterations >= self.max_iterations {
            return false;
        }
        self.iterations += 1;
        true
    }

    pub fn record(&mut self, action: AgentAction, observation: impl Into<String>) {
        self.steps.push(AgentStep {
            action,
            observation: observation.into(),
        });
    }

    /// Render the steps so far as the model's continuation text.
    ///
    /// Each step is the raw reply followed by its observation and a fresh
    /// `Thought:` cue.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            out.push_str(&step.action.log);
            out.push_str("\nObservation: ");
            out.push_str(&step.observation);
            out.push_str("\nThought: ");
        }
        out
    }

    /// Render steps for the fallback prompt, one block per step.
    pub fn render_for_summary(steps: &[AgentStep]) -> String {
        steps
            .iter()
            .enumerate()
            .map(|(i, s)| {
                format!(
                    "Langkah {}:\nAction: {}\nAction Input: {}\nObservation: {}",
                    i + 1,
                    s.action.tool,
                    s.action.tool_input,
                    s.observation
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
