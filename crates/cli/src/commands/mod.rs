//! Subcommand implementations and the wiring they share.

pub mod chat;
pub mod doctor;
pub mod ping_model;
pub mod search;
pub mod serve;

use std::sync::Arc;

use cekfakta_agent::FactChecker;
use cekfakta_config::AppConfig;
use cekfakta_core::Error;
use cekfakta_core::event::EventBus;
use cekfakta_tools::GoogleSearchClient;

pub fn load_config() -> cekfakta_core::Result<AppConfig> {
    AppConfig::load().map_err(|e| Error::Config {
        message: e.to_string(),
    })
}

/// Build the model provider, the search tool and the agent from config.
pub fn build_checker(config: &AppConfig) -> cekfakta_core::Result<Arc<FactChecker>> {
    let provider = cekfakta_providers::build_from_config(config)?;
    let search = GoogleSearchClient::from_config(config)?;
    let tools = Arc::new(cekfakta_tools::default_registry(Arc::new(search)));

    Ok(Arc::new(FactChecker::from_config(
        config,
        provider,
        tools,
        Arc::new(EventBus::default()),
    )))
}
