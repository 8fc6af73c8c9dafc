//! TrendScope - LLM-backed social media trend intelligence service
//!
//! An HTTP service that asks a chat completion API for synthetic trend
//! records, stores them per analysis session, and serves aggregated
//! dashboard metrics for a stored session.
//!
//! Endpoints:
//!   POST /api/analyze-trends
//!   GET  /api/dashboard-data/:sessionId

mod analysis;
mod cli;
mod config;
mod error;
mod llm;
mod models;
mod server;
mod store;

use analysis::TrendAnalyzer;
use anyhow::{Context, Result};
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use llm::OpenAiClient;
use server::AppState;
use std::sync::Arc;
use store::TrendStore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up OPENAI_API_KEY, DATABASE_URL, ... from a local .env
    dotenv::dotenv().ok();

    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args)?;

    info!("TrendScope v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server(args).await {
        error!("Server failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .trendscope.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", DEFAULT_CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize the server, database, and model.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG`, when set, takes precedence over the CLI flags.
fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().to_string()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Build the collaborators, serve until shutdown, then release them.
async fn run_server(args: Args) -> Result<()> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    debug!("Configuration: {:?}", config);

    if config.model.api_key.is_none() {
        warn!("No API key configured; chat requests will be sent unauthenticated");
    }

    let store = TrendStore::connect(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;

    let client = OpenAiClient::new(config.model.openai_config())
        .context("Failed to create HTTP client")?;

    let analyzer = TrendAnalyzer::new(store.clone(), Arc::new(client), config.generation.clone());
    let state = AppState {
        analyzer: Arc::new(analyzer),
    };

    let result = server::serve(&config.server.bind, state).await;

    store.close().await;
    result
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
