//! Parser for the text ReAct protocol.
//!
//! The model answers in one of two shapes:
//!
//! ```text
//! Thought: Do I need to use a tool? Yes
//! Action: pencari_fakta_medis
//! Action Input: efek samping begadang
//! ```
//!
//! or
//!
//! ```text
//! Thought: Do I need to use a tool? No
//! Final Answer: ...
//! ```
//!
//! Anything else is a format error, which the loop feeds back to the model
//! as an observation instead of failing the turn.

use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// Tool name recorded for steps whose model output could not be parsed.
pub const INVALID_FORMAT_ACTION: &str = "_invalid_format";

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
        .expect("static regex")
});
static ACTION_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Action\s*\d*\s*:").expect("static regex"));

/// A tool call chosen by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAction {
    pub tool: String,
    pub tool_input: String,
    /// The raw model text that produced this action, replayed in the scratchpad.
    pub log: String,
}

/// One parsed model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentOutput {
    Action(AgentAction),
    Finish { answer: String, log: String },
}

/// Why a reply could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not parse LLM output: `{llm_output}`")]
pub struct ParseError {
    /// Text handed back to the model as the observation.
    pub observation: String,
    pub llm_output: String,
}

/// Parse one model reply into an action or a final answer.
pub fn parse(text: &str) -> Result<AgentOutput, ParseError> {
    let includes_answer = text.contains(FINAL_ANSWER_MARKER);

    if let Some(caps) = ACTION_RE.captures(text) {
        if includes_answer {
            return Err(ParseError {
                observation: "Invalid Format: the reply contains both a final answer and an \
                              action. Give either an Action or a Final Answer, not both."
                    .into(),
                llm_output: text.to_string(),
            });
        }
        let tool = caps.get(1).map_or("", |m| m.as_str()).trim();
        let raw_input = caps.get(2).map_or("", |m| m.as_str());
        // Models that ignore the stop sequence may hallucinate an observation.
        let raw_input = raw_input
            .split("\nObservation")
            .next()
            .unwrap_or(raw_input);
        let tool_input = raw_input.trim().trim_matches('"').trim();

        return Ok(AgentOutput::Action(AgentAction {
            tool: tool.to_string(),
            tool_input: tool_input.to_string(),
            log: text.to_string(),
        }));
    }

    if includes_answer {
        let answer = text
            .rsplit(FINAL_ANSWER_MARKER)
            .next()
            .unwrap_or_default()
            .trim();
        return Ok(AgentOutput::Finish {
            answer: answer.to_string(),
            log: text.to_string(),
        });
    }

    let observation = if !ACTION_ONLY_RE.is_match(text) {
        "Invalid Format: Missing 'Action:' after 'Thought:'"
    } else {
        "Invalid Format: Missing 'Action Input:' after 'Action:'"
    };
    Err(ParseError {
        observation: observation.into(),
        llm_output: text.to_string(),
    })
}
