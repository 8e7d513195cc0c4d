//! Prompt text for the fact-checking agent and its fallback summarizer.

use cekfakta_core::tool::ToolRegistry;

use crate::references::{Source, render_sources};

/// Instruction appended to every final answer: numbered `Referensi:` list,
/// or an explicit statement that no external reference was used.
pub const REFERENCE_INSTRUCTION: &str = "PENTING: Setelah memberikan jawaban akhir, kamu WAJIB \
menyertakan bagian \"Referensi:\" di bawah jawabanmu. Cantumkan daftar bernomor dari sumber-sumber \
yang kamu gunakan dari hasil `pencari_fakta_medis`, lengkap dengan judul dan link-nya. Jika kamu \
tidak menggunakan tool pencarian, sebutkan bahwa jawaban dihasilkan tanpa referensi eksternal.";

/// Build the system instruction listing the registered tools.
pub fn system_prompt(tools: &ToolRegistry) -> String {
    let tool_names = tools.names().join(", ");
    format!(
        "Assistant is a helper for questions about medical claims, providing answers from trusted sources.

TOOLS:
------
Assistant has access to the following tools:
{tools}

To use a tool, please use the following format:

Thought: Do I need to use a tool? Yes
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action

When you have a response to say to the Human, or if you do not need to use a tool, you MUST use the format:

Thought: Do I need to use a tool? No
Final Answer: [the final answer to the original input question]

{REFERENCE_INSTRUCTION}

Begin!",
        tools = tools.describe(),
    )
}

/// The user turn for the current cycle: the question, then the scratchpad.
pub fn user_turn(input: &str, scratchpad: &str) -> String {
    if scratchpad.is_empty() {
        input.to_string()
    } else {
        format!("{input}\n\n{scratchpad}")
    }
}

/// Single-shot prompt asking for the best answer from partial research.
pub fn fallback_prompt(query: &str, steps_text: &str, sources: &[Source]) -> String {
    let sources_text = if sources.is_empty() {
        "(tidak ada sumber yang ditemukan)".to_string()
    } else {
        render_sources(sources)
    };
    format!(
        "Berdasarkan pertanyaan pengguna: '{query}' dan langkah-langkah penelitian yang sudah kamu lakukan sejauh ini:
---
{steps_text}
---
Sumber yang ditemukan:
{sources_text}

Tolong berikan jawaban rangkuman terbaik yang bisa kamu berikan kepada pengguna.

PENTING: Setelah memberikan jawaban rangkuman, kamu WAJIB menyertakan bagian \"Referensi:\" di bawah jawabanmu. Cantumkan daftar bernomor dari sumber-sumber yang kamu temukan dalam langkah-langkah penelitian di atas, lengkap dengan judul dan link-nya."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cekfakta_tools::default_registry;
    use cekfakta_tools::search::{SearchClient, SearchResult};
    use cekfakta_core::error::SearchError;
    use std::sync::Arc;

    struct NoSearch;

    #[async_trait::async_trait]
    impl SearchClient for NoSearch {
        async fn try_search(&self, _q: &str) -> Result<Vec<SearchResult>, SearchError> {
            Ok(vec![])
        }
    }

    #[test]
    fn system_prompt_lists_tool_and_format() {
        let prompt = system_prompt(&default_registry(Arc::new(NoSearch)));
        assert!(prompt.contains("pencari_fakta_medis: Gunakan tool ini"));
        assert!(prompt.contains("should be one of [pencari_fakta_medis]"));
        assert!(prompt.contains("Final Answer:"));
        assert!(prompt.ends_with("Begin!"));
    }

    #[test]
    fn system_prompt_demands_no_reference_statement() {
        let prompt = system_prompt(&ToolRegistry::new());
        assert!(prompt.contains("\"Referensi:\""));
        assert!(prompt.contains("tanpa referensi eksternal"));
    }

    #[test]
    fn user_turn_appends_scratchpad() {
        assert_eq!(user_turn("kopi?", ""), "kopi?");
        assert_eq!(
            user_turn("kopi?", "Action: x\nObservation: y\nThought: "),
            "kopi?\n\nAction: x\nObservation: y\nThought: "
        );
    }

    #[test]
    fn fallback_prompt_includes_query_steps_and_sources() {
        let sources = vec![Source {
            title: "Kurang Tidur".into(),
            link: "https://sehat.example/tidur".into(),
        }];
        let prompt = fallback_prompt("efek begadang", "Langkah 1: ...", &sources);
        assert!(prompt.contains("pertanyaan pengguna: 'efek begadang'"));
        assert!(prompt.contains("Langkah 1: ..."));
        assert!(prompt.contains("1. Kurang Tidur - https://sehat.example/tidur"));
        assert!(prompt.contains("\"Referensi:\""));
    }

    #[test]
    fn fallback_prompt_without_sources() {
        let prompt = fallback_prompt("q", "", &[]);
        assert!(prompt.contains("tidak ada sumber yang ditemukan"));
    }
}
