//! chemviz - Chemical Equipment Parameter Visualizer server
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (127.0.0.1:8080, admin/admin, in-memory history)
//! cargo run --release
//!
//! # Custom bind address and config file
//! ./chemviz --addr 0.0.0.0:9000 --config /etc/chemviz/chemviz.toml
//! ```
//!
//! # Environment Variables
//!
//! - `CHEMVIZ_CONFIG`: Path to TOML config file
//! - `CHEMVIZ_SERVER_ADDR`, `CHEMVIZ_USERNAME`, `CHEMVIZ_PASSWORD`,
//!   `CHEMVIZ_CORS_ORIGINS`, `CHEMVIZ_HISTORY_DB`: config overrides
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use chemviz::api::{create_app, ApiState};
use chemviz::config::AppConfig;
use chemviz::storage::HistoryStore;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "chemviz")]
#[command(about = "Chemical equipment CSV summary and report service")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "127.0.0.1:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to a TOML config file (takes precedence over CHEMVIZ_CONFIG)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Wipe the persistent history database on startup.
    /// Can also be set via RESET_DB=true environment variable.
    #[arg(long)]
    reset_db: bool,
}

// ============================================================================
// Database Reset
// ============================================================================

/// Check if database reset is requested via CLI flag or environment variable.
fn should_reset_db(cli_flag: bool) -> bool {
    if cli_flag {
        return true;
    }
    if let Ok(val) = std::env::var("RESET_DB") {
        let val_lower = val.to_lowercase();
        return val_lower == "true" || val_lower == "1" || val_lower == "yes";
    }
    false
}

fn reset_history_db(path: &Path) -> Result<()> {
    if !path.exists() {
        info!(path = %path.display(), "History database does not exist, nothing to reset");
        return Ok(());
    }
    warn!(path = %path.display(), "RESET_DB: removing history database");
    std::fs::remove_dir_all(path).context("Failed to remove history database")?;
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let mut config = AppConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            config.apply_overrides(|key| std::env::var(key).ok());
            config
        }
        None => AppConfig::load(),
    };
    if let Some(addr) = &args.addr {
        config.server.addr.clone_from(addr);
    }
    config.validate()?;
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_json);

    let config = load_config(&args)?;
    if config.uses_default_credentials() {
        warn!("Using built-in credentials; set CHEMVIZ_USERNAME/CHEMVIZ_PASSWORD for anything but local use");
    }

    let history = match &config.history.db_path {
        Some(path) => {
            if should_reset_db(args.reset_db) {
                reset_history_db(path)?;
            }
            HistoryStore::open(path, config.history.capacity)
                .with_context(|| format!("Failed to open history at {}", path.display()))?
        }
        None => HistoryStore::in_memory(config.history.capacity),
    };

    let app = create_app(ApiState::new(&config, history));

    let listener = tokio::net::TcpListener::bind(&config.server.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.addr))?;
    info!(
        addr = %config.server.addr,
        capacity = config.history.capacity,
        persistent = config.history.db_path.is_some(),
        "chemviz listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("chemviz stopped");
    Ok(())
}
