//! Source extraction from tool observations.
//!
//! Search observations are JSON arrays of `{title, link, snippet}` objects
//! (or a single error string). Every distinct `(title, link)` pair seen
//! across a run becomes one [`Source`], in first-seen order.

use serde::{Deserialize, Serialize};

use crate::scratchpad::AgentStep;

/// Heading the answer's reference list must start with.
pub const REFERENCE_HEADING: &str = "Referensi";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub link: String,
}

/// Distinct sources across all observations.
///
/// Observations that are not JSON arrays (format errors, tool errors) are
/// skipped, as are entries without both a non-blank title and link.
pub fn collect_sources(steps: &[AgentStep]) -> Vec<Source> {
    let mut sources: Vec<Source> = Vec::new();
    for step in steps {
        let Ok(serde_json::Value::Array(items)) =
            serde_json::from_str::<serde_json::Value>(&step.observation)
        else {
            continue;
        };
        for item in items {
            let (Some(title), Some(link)) = (
                item.get("title").and_then(|v| v.as_str()),
                item.get("link").and_then(|v| v.as_str()),
            ) else {
                continue;
            };
            if title.trim().is_empty() || link.trim().is_empty() {
                continue;
            }
            let source = Source {
                title: title.to_string(),
                link: link.to_string(),
            };
            if !sources.contains(&source) {
                sources.push(source);
            }
        }
    }
    sources
}

/// Numbered `title - link` list.
pub fn render_sources(sources: &[Source]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {} - {}", i + 1, s.title, s.link))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn has_reference_section(answer: &str) -> bool {
    answer.to_lowercase().contains(&REFERENCE_HEADING.to_lowercase())
}
