//! Search client and tools for Cek Fakta.
//!
//! The agent has exactly one capability: `pencari_fakta_medis`, a web search
//! over trusted health sources.

pub mod fact_check;
pub mod search;

pub use fact_check::{FACT_CHECK_TOOL_DESCRIPTION, FACT_CHECK_TOOL_NAME, FactCheckTool};
pub use search::{
    GoogleSearchClient, SEARCH_ERROR_PREFIX, SearchClient, SearchHit, SearchResult, ToolInvocation,
};

use cekfakta_core::tool::ToolRegistry;
use std::sync::Arc;

/// Create the tool registry the fact-checking agent runs with.
pub fn default_registry(search: Arc<dyn SearchClient>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(FactCheckTool::new(search)));
    registry
}
