//! Configuration loading, validation, and management for Cek Fakta.
//!
//! Loads configuration from `~/.cekfakta/config.toml` with environment
//! variable overrides. The resulting [`AppConfig`] is built once at startup
//! and passed down explicitly; nothing else reads the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the language-model API key.
pub const ENV_MODEL_API_KEY: &str = "GOOGLE_API_KEY";
/// Environment variable holding the search API key.
pub const ENV_SEARCH_API_KEY: &str = "GOOGLE_API_KEY_SEARCH";
/// Environment variable holding the custom search engine identifier.
pub const ENV_SEARCH_ENGINE_ID: &str = "GOOGLE_CSE_ID";
/// Environment variable overriding the model identifier.
pub const ENV_MODEL: &str = "CEKFAKTA_MODEL";

/// Hard upper bound on results per search query.
pub const MAX_SEARCH_RESULTS: u32 = 5;

/// The root configuration structure.
///
/// Maps directly to `~/.cekfakta/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language-model settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Web search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Agent loop settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Web chat server settings
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default)]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    #[serde(default = "default_model_api_url")]
    pub api_url: String,

    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-2.5-flash".into()
}
fn default_model_api_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn default_model_timeout() -> u64 {
    120
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: 0.0,
            max_output_tokens: None,
            api_url: default_model_api_url(),
            timeout_secs: default_model_timeout(),
        }
    }
}

impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Custom search engine identifier (`cx`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_id: Option<String>,

    #[serde(default = "default_num_results")]
    pub num_results: u32,

    #[serde(default = "default_search_api_url")]
    pub api_url: String,

    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

fn default_num_results() -> u32 {
    MAX_SEARCH_RESULTS
}
fn default_search_api_url() -> String {
    "https://www.googleapis.com".into()
}
fn default_search_timeout() -> u64 {
    60
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            engine_id: None,
            num_results: default_num_results(),
            api_url: default_search_api_url(),
            timeout_secs: default_search_timeout(),
        }
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &redact(&self.api_key))
            .field("engine_id", &self.engine_id)
            .field("num_results", &self.num_results)
            .field("api_url", &self.api_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum think/act/observe cycles before falling back to a summary
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_max_iterations() -> u32 {
    3
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// In-memory chat sessions kept before the oldest is dropped
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_port() -> u16 {
    8501
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_max_sessions() -> usize {
    1_000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.cekfakta/config.toml),
    /// then apply process environment overrides.
    ///
    /// - `GOOGLE_API_KEY`: model API key
    /// - `GOOGLE_API_KEY_SEARCH`: search API key
    /// - `GOOGLE_CSE_ID`: search engine id
    /// - `CEKFAKTA_MODEL`: model identifier
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Environment values win over the file. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_MODEL_API_KEY) {
            self.model.api_key = Some(key);
        }
        if let Some(key) = get(ENV_SEARCH_API_KEY) {
            self.search.api_key = Some(key);
        }
        if let Some(cx) = get(ENV_SEARCH_ENGINE_ID) {
            self.search.engine_id = Some(cx);
        }
        if let Some(model) = get(ENV_MODEL) {
            self.model.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".cekfakta")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.model.temperature) {
            return Err(ConfigError::ValidationError(
                "model.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.search.num_results == 0 || self.search.num_results > MAX_SEARCH_RESULTS {
            return Err(ConfigError::ValidationError(format!(
                "search.num_results must be between 1 and {MAX_SEARCH_RESULTS}"
            )));
        }

        if self.gateway.max_sessions == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.max_sessions must be at least 1".into(),
            ));
        }

        if self.agent.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_iterations must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// The model API key, or an error naming the variable to set.
    pub fn require_model_key(&self) -> Result<&str, ConfigError> {
        self.model
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingSecret(ENV_MODEL_API_KEY))
    }

    /// The search API key and engine id, or an error naming what is missing.
    pub fn require_search_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let key = self
            .search
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingSecret(ENV_SEARCH_API_KEY))?;
        let cx = self
            .search
            .engine_id
            .as_deref()
            .ok_or(ConfigError::MissingSecret(ENV_SEARCH_ENGINE_ID))?;
        Ok((key, cx))
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("Missing secret: set {0} in the environment or config file")]
    MissingSecret(&'static str),
}
