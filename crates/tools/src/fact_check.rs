//! `pencari_fakta_medis`: the medical fact-finding tool.
//!
//! Wraps a [`SearchClient`] so the agent loop can look up current health
//! information. The model decides when to call it by reading the
//! description, so the description is part of the tool's contract.

use async_trait::async_trait;
use cekfakta_core::error::ToolError;
use cekfakta_core::tool::{Tool, ToolResult};
use std::sync::Arc;
use tracing::debug;

use crate::search::{SearchClient, ToolInvocation};

/// Name the model uses to select this tool.
pub const FACT_CHECK_TOOL_NAME: &str = "pencari_fakta_medis";

/// "Use this tool when you need current medical or health information from
/// trusted sources on the internet. Pass a relevant search query as input."
pub const FACT_CHECK_TOOL_DESCRIPTION: &str = "Gunakan tool ini ketika kamu perlu mencari \
informasi medis atau kesehatan terkini dari sumber-sumber terpercaya di internet. \
Masukkan query pencarian yang relevan sebagai input.";

pub struct FactCheckTool {
    client: Arc<dyn SearchClient>,
}

impl FactCheckTool {
    pub fn new(client: Arc<dyn SearchClient>) -> Self {
        Self { client }
    }
}

/// Trim whitespace and one layer of surrounding quotes from model input.
fn normalize_query(input: &str) -> &str {
    let trimmed = input.trim();
    for quote in ['"', '\'', '`'] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|s| s.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    trimmed
}

#[async_trait]
impl Tool for FactCheckTool {
    fn name(&self) -> &str {
        FACT_CHECK_TOOL_NAME
    }

    fn description(&self) -> &str {
        FACT_CHECK_TOOL_DESCRIPTION
    }

    async fn invoke(&self, input: &str) -> Result<ToolResult, ToolError> {
        let query = normalize_query(input);
        if query.is_empty() {
            return Err(ToolError::InvalidInput("query pencarian kosong".into()));
        }

        let results = self.client.search(query).await;
        let success = !results.iter().any(|h| h.is_error());
        debug!(query, count = results.len(), success, "Fact-check search finished");

        let output = serde_json::to_string(&results).map_err(|e| ToolError::ExecutionFailed {
            tool_name: FACT_CHECK_TOOL_NAME.into(),
            reason: e.to_string(),
        })?;

        let invocation = ToolInvocation {
            query: query.to_string(),
            results,
        };

        Ok(ToolResult {
            success,
            output,
            data: serde_json::to_value(&invocation).ok(),
        })
    }
}
