//! Tool trait: the abstraction over agent capabilities.
//!
//! A tool is a named capability with a natural-language description. The
//! agent loop shows every description to the model, and when the model picks
//! a tool by name the registry dispatches the raw text input to it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use crate::error::ToolError;

/// The result of a tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the tool produced what was asked of it
    pub success: bool,

    /// Text handed back to the model as the observation
    pub output: String,

    /// Optional structured data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// The core Tool trait.
///
/// Every tool takes plain text in and hands text back, so the registry can
/// treat all of them uniformly.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name the model uses to select this tool.
    fn name(&self) -> &str;

    /// When to use this tool and what to pass it (sent to the model).
    fn description(&self) -> &str;

    /// Invoke the tool with the model-supplied input.
    async fn invoke(&self, input: &str) -> std::result::Result<ToolResult, ToolError>;
}

/// A registry of available tools keyed by name.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Invoke a tool by name.
    pub async fn invoke(&self, name: &str, input: &str) -> std::result::Result<ToolResult, ToolError> {
        let tool = self.tools.get(name).ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.invoke(input).await
    }

    /// Registered tool names, sorted so prompts are stable.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// `name: description` lines in name order, for the system prompt.
    pub fn describe(&self) -> String {
        self.names()
            .into_iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
