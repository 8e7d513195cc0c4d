//! `cekfakta ping-model`: Send one prompt to the model.

use cekfakta_core::provider::ProviderRequest;

/// "Explain simply, in Indonesian, what the hormone cortisol is and what it does."
pub const DEFAULT_PROMPT: &str =
    "Jelaskan secara sederhana dalam bahasa Indonesia, apa itu hormon kortisol dan apa fungsinya?";

pub async fn run(prompt: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let provider = cekfakta_providers::build_from_config(&config)?;
    let prompt = prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string());

    println!("Model yang digunakan: {}", config.model.model);
    println!("Mengirim prompt: '{prompt}'");
    println!("{}", "-".repeat(50));

    let mut request = ProviderRequest::prompt(&config.model.model, prompt);
    request.temperature = config.model.temperature;
    request.max_tokens = config.model.max_output_tokens;

    let response = provider.complete(request).await?;

    println!("Respons dari {}:", response.model);
    println!("{}", response.text);
    if let Some(usage) = response.usage {
        tracing::debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Model usage"
        );
    }

    Ok(())
}
