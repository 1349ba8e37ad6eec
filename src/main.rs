//! MediDir Server: healthcare facility directory API
//!
//! Main entry point that wires all crates together and starts the server.

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

use medidir_core::config::AppConfig;
use medidir_core::error::AppError;
use medidir_database::DatabasePool;
use medidir_database::migration::run_migrations;

#[tokio::main]
async fn main() {
    let env = std::env::var("MEDIDIR_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        error!(kind = %e.kind, error = %e.message, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    info!("Starting MediDir v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = DatabasePool::connect(&config.database).await?;
    run_migrations(db.pool()).await?;

    // ── Step 2: Serve ────────────────────────────────────────────
    medidir_api::run_server(config, db).await
}
