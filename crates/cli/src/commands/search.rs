//! `cekfakta search`: Run one search and print what came back.

use std::io::Write;

use cekfakta_tools::{GoogleSearchClient, SearchClient, SearchHit};

pub async fn run(query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let client = GoogleSearchClient::from_config(&config)?;

    println!("Melakukan pencarian untuk: '{query}'\n");
    let hits = client.search(query).await;
    print_hits(&hits, &mut std::io::stdout())?;

    Ok(())
}

/// Numbered `Judul` / `Link` / `Kutipan` blocks, or a single notice when
/// nothing usable came back.
pub fn print_hits<W: Write>(hits: &[SearchHit], out: &mut W) -> std::io::Result<()> {
    if let Some(SearchHit::Error(message)) = hits.first() {
        writeln!(out, "{message}")?;
        return Ok(());
    }
    if hits.is_empty() {
        writeln!(out, "Tidak ada hasil yang ditemukan.")?;
        return Ok(());
    }

    writeln!(out, "Menemukan {} hasil:\n", hits.len())?;
    for (i, result) in hits.iter().filter_map(SearchHit::as_result).enumerate() {
        writeln!(out, "--- Hasil #{} ---", i + 1)?;
        writeln!(out, "Judul: {}", result.title)?;
        writeln!(out, "Link: {}", result.link)?;
        writeln!(out, "Kutipan: {}", result.snippet)?;
        writeln!(out, "{}", "-".repeat(20))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cekfakta_tools::SearchResult;

    fn render(hits: &[SearchHit]) -> String {
        let mut out = Vec::new();
        print_hits(hits, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn prints_numbered_results() {
        let hits = vec![
            SearchHit::Result(SearchResult {
                title: "Bahaya Begadang".into(),
                link: "https://sehat.example/begadang".into(),
                snippet: "Kurang tidur meningkatkan risiko...".into(),
            }),
            SearchHit::Result(SearchResult {
                title: "Tidur Sehat".into(),
                link: "https://sehat.example/tidur".into(),
                snippet: String::new(),
            }),
        ];
        let text = render(&hits);
        assert!(text.starts_with("Menemukan 2 hasil:"));
        assert!(text.contains("--- Hasil #1 ---\nJudul: Bahaya Begadang\nLink: https://sehat.example/begadang"));
        assert!(text.contains("--- Hasil #2 ---"));
        assert!(text.contains("Kutipan: Kurang tidur"));
    }

    #[test]
    fn prints_error_entry() {
        let hits = vec![SearchHit::Error(
            "Terjadi error saat pencarian: network failure: timeout".into(),
        )];
        assert_eq!(
            render(&hits),
            "Terjadi error saat pencarian: network failure: timeout\n"
        );
    }

    #[test]
    fn prints_empty_notice() {
        assert_eq!(render(&[]), "Tidak ada hasil yang ditemukan.\n");
    }
}
