//! `cekfakta chat`: Interactive console or single-message mode.

use std::io::Write;

use cekfakta_agent::FactChecker;
use cekfakta_core::event::DomainEvent;
use cekfakta_core::message::Conversation;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

pub const WELCOME: &str = "🩺 Selamat Datang di Asisten Cek Fakta Medis! 🩺";
pub const PROMPT: &str = "Silakan masukkan pertanyaan atau klaim medis Anda: ";
pub const FAREWELL: &str = "Terima kasih telah menggunakan asisten ini. Sampai jumpa!";
pub const EXIT_WORD: &str = "keluar";

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let checker = super::build_checker(&config)?;

    if let Some(msg) = message {
        let mut conversation = Conversation::new();
        eprint!("  Sedang mencari dan menganalisis...");
        let outcome = checker.process_turn(&mut conversation, &msg).await?;
        eprint!("\r{}\r", " ".repeat(36));
        println!("{}", outcome.answer);
        return Ok(());
    }

    // Show searches while the user waits.
    let mut events = checker.event_bus().subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let DomainEvent::ToolExecuted { input, .. } = event.as_ref() {
                eprintln!("  🔎 Mencari: {input}");
            }
        }
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    console_loop(&checker, stdin, &mut stdout).await?;

    Ok(())
}

/// Read questions line by line until `keluar` (any case) or end of input.
///
/// A failed turn prints an error line and the loop keeps going.
pub async fn console_loop<R, W>(
    checker: &FactChecker,
    input: R,
    out: &mut W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let rule = "=".repeat(50);
    writeln!(out, "{rule}")?;
    writeln!(out, "{WELCOME}")?;
    writeln!(out, "Ketik '{EXIT_WORD}' untuk mengakhiri program.")?;
    writeln!(out, "{rule}")?;

    let mut lines = input.lines();
    let mut conversation = Conversation::new();

    loop {
        write!(out, "\n{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        let question = line.trim();
        if question.eq_ignore_ascii_case(EXIT_WORD) {
            break;
        }
        if question.is_empty() {
            continue;
        }

        match checker.process_turn(&mut conversation, question).await {
            Ok(outcome) => {
                writeln!(out, "\nJawaban Asisten:")?;
                writeln!(out, "{}", outcome.answer)?;
            }
            Err(e) => {
                writeln!(out, "\n[Error] Gagal mendapatkan jawaban: {e}")?;
            }
        }
    }

    writeln!(out, "{FAREWELL}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cekfakta_config::AppConfig;
    use cekfakta_core::error::{ProviderError, SearchError};
    use cekfakta_core::event::EventBus;
    use cekfakta_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use cekfakta_tools::search::{SearchClient, SearchResult};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replies with the queued texts in order; fails once they run out.
    struct CountingProvider {
        replies: Vec<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Provider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            match self.replies.get(n) {
                Some(text) => Ok(ProviderResponse {
                    text: (*text).to_string(),
                    usage: None,
                    model: "counting".into(),
                    finish_reason: None,
                }),
                None => Err(ProviderError::Timeout("model did not answer".into())),
            }
        }
    }

    struct CountingSearch {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchClient for CountingSearch {
        async fn try_search(&self, _query: &str) -> Result<Vec<SearchResult>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![])
        }
    }

    fn fixture(replies: Vec<&'static str>) -> (FactChecker, Arc<CountingProvider>, Arc<CountingSearch>) {
        let provider = Arc::new(CountingProvider {
            replies,
            calls: AtomicUsize::new(0),
        });
        let search = Arc::new(CountingSearch {
            calls: AtomicUsize::new(0),
        });
        let checker = FactChecker::from_config(
            &AppConfig::default(),
            provider.clone(),
            Arc::new(cekfakta_tools::default_registry(search.clone())),
            Arc::new(EventBus::default()),
        );
        (checker, provider, search)
    }

    async fn drive(checker: &FactChecker, input: &str) -> String {
        let mut out = Vec::new();
        console_loop(checker, input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn exit_word_first_makes_no_calls() {
        let (checker, provider, search) = fixture(vec![]);
        let output = drive(&checker, "keluar\n").await;

        assert!(output.contains(WELCOME));
        assert!(output.trim_end().ends_with(FAREWELL));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert_eq!(search.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn exit_word_is_case_insensitive() {
        let (checker, provider, _) = fixture(vec![]);
        let output = drive(&checker, "  KELUAR  \n").await;
        assert!(output.contains(FAREWELL));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn answers_then_exits() {
        let (checker, provider, _) = fixture(vec![
            "Thought: Do I need to use a tool? No\nFinal Answer: Kortisol adalah hormon stres. Jawaban ini dihasilkan tanpa referensi eksternal.",
        ]);
        let output = drive(&checker, "apa itu kortisol?\n\nkeluar\n").await;

        assert!(output.contains("Jawaban Asisten:\nKortisol adalah hormon stres."));
        assert_eq!(output.matches(PROMPT).count(), 3);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn model_failure_keeps_looping() {
        let (checker, _, _) = fixture(vec![]);
        let output = drive(&checker, "apakah kopi sehat?\nkeluar\n").await;

        assert!(output.contains("[Error] Gagal mendapatkan jawaban"));
        assert!(output.contains("model did not answer"));
        assert!(output.contains(FAREWELL));
    }

    #[tokio::test]
    async fn end_of_input_says_goodbye() {
        let (checker, _, _) = fixture(vec![]);
        let output = drive(&checker, "").await;
        assert!(output.contains(FAREWELL));
    }
}
