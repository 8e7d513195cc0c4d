//! Language-model provider implementations for Cek Fakta.
//!
//! All providers implement the `cekfakta_core::Provider` trait.

pub mod gemini;

pub use gemini::GeminiProvider;

use std::sync::Arc;
use std::time::Duration;
use cekfakta_config::AppConfig;
use cekfakta_core::error::ProviderError;
use cekfakta_core::provider::Provider;

/// Build the configured model provider.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config
        .require_model_key()
        .map_err(|e| ProviderError::NotConfigured(e.to_string()))?;

    let provider = GeminiProvider::new(api_key, Duration::from_secs(config.model.timeout_secs))?
        .with_base_url(&config.model.api_url);

    Ok(Arc::new(provider))
}
