//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// TrendScope - LLM-backed social media trend intelligence service
///
/// Serves two JSON endpoints: one generates and stores a trend analysis
/// session, the other aggregates a stored session into dashboard metrics.
///
/// Examples:
///   trendscope
///   trendscope --bind 127.0.0.1:8080 --database-url sqlite://trends.sqlite
///   trendscope --model gpt-4o --api-base http://localhost:8000/v1
///   trendscope --init-config
#[derive(Parser, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Address to listen on
    ///
    /// Default: from config or 0.0.0.0:3000.
    #[arg(short, long, value_name = "ADDR", env = "TRENDSCOPE_BIND")]
    pub bind: Option<String>,

    /// Database connection URL
    ///
    /// Default: from config or sqlite://trendscope.sqlite.
    #[arg(long, value_name = "URL", env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections
    #[arg(long, value_name = "NUM")]
    pub max_connections: Option<u32>,

    /// Chat model used for generation
    #[arg(short, long, env = "TRENDSCOPE_MODEL")]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, value_name = "URL", env = "OPENAI_BASE_URL")]
    pub api_base: Option<String>,

    /// API key for the chat completion API
    #[arg(long, value_name = "KEY", env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Chat request timeout in seconds
    ///
    /// Unset means requests wait as long as the API takes.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .trendscope.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .trendscope.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref api_base) = self.api_base {
            if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
                return Err("API base URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.max_connections == Some(0) {
            return Err("Max connections must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Args {
            bind: None,
            database_url: None,
            max_connections: None,
            model: None,
            api_base: None,
            api_key: None,
            timeout: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }
}
