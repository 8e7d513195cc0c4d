//! The fact-checking agent loop.
//!
//! The agent follows a **Thought → Action → Observation** cycle:
//!
//! 1. **Receive** a user question plus the prior conversation
//! 2. **Send to the model** with the tool descriptions and the scratchpad
//! 3. **If an action**: run the named tool, record the observation, loop back to 2
//! 4. **If a final answer**: return it
//!
//! The loop stops after a fixed number of cycles. A run that hits the limit
//! is handed to the [`FallbackSummarizer`], which turns the partial research
//! into an answer with one more model call.

pub mod fallback;
pub mod parser;
pub mod prompt;
pub mod react;
pub mod references;
pub mod scratchpad;
pub mod session;

#[cfg(test)]
mod test_helpers;

pub use fallback::FallbackSummarizer;
pub use parser::{AgentAction, AgentOutput, ParseError};
pub use react::{AgentRunResult, ReactAgent};
pub use references::Source;
pub use scratchpad::{AgentStep, Scratchpad};
pub use session::{FactChecker, TurnOutcome};
