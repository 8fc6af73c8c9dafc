//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.trendscope.toml` files.

use crate::llm::{GenerationSettings, OpenAiConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".trendscope.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Chat completion API settings.
    #[serde(default)]
    pub model: ModelConfig,

    /// Sampling settings for the generation calls.
    #[serde(default)]
    pub generation: GenerationSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://trendscope.sqlite".to_string()
}

fn default_max_connections() -> u32 {
    5
}

/// Chat completion API settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name sent with every request.
    #[serde(default = "default_model")]
    pub name: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// API key. Usually supplied through `OPENAI_API_KEY` instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model(),
            api_base: default_api_base(),
            api_key: None,
            timeout_seconds: None,
        }
    }
}

// Hand-written so the key never reaches the logs.
impl std::fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelConfig")
            .field("name", &self.name)
            .field("api_base", &self.api_base)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

impl ModelConfig {
    /// Settings for the HTTP chat client.
    pub fn openai_config(&self) -> OpenAiConfig {
        OpenAiConfig {
            api_base: self.api_base.clone(),
            api_key: self.api_key.clone(),
            model: self.name.clone(),
            timeout_seconds: self.timeout_seconds,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// Only values given on the command line (or through their environment
    /// variables) override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref bind) = args.bind {
            self.server.bind = bind.clone();
        }

        if let Some(ref url) = args.database_url {
            self.database.url = url.clone();
        }
        if let Some(max) = args.max_connections {
            self.database.max_connections = max;
        }

        if let Some(ref model) = args.model {
            self.model.name = model.clone();
        }
        if let Some(ref api_base) = args.api_base {
            self.model.api_base = api_base.clone();
        }
        if let Some(ref api_key) = args.api_key {
            self.model.api_key = Some(api_key.clone());
        }
        if let Some(timeout) = args.timeout {
            self.model.timeout_seconds = Some(timeout);
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
