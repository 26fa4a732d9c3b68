//! Cache Janitor - keeps a cache directory under its size budget
//!
//! Runs a cleanup pass at startup, then a background cleaner on a fixed
//! interval, and exposes status plus an on-demand cleanup endpoint over HTTP.

mod config;
mod error;
mod server;
mod types;

use crate::config::JanitorConfig;
use crate::error::Result;
use crate::server::{start_server, ServerState, SharedState};
use bounded_dir_cache::CacheDirectory;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env()
        .add_directive("cache_janitor=info".parse()?)
        .add_directive("bounded_dir_cache=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting Cache Janitor...");

    // Load configuration from environment
    let config = JanitorConfig::from_env();
    let cache_config = config.cache_config(&std::env::current_dir()?);
    info!("Port: {}", config.port);
    info!("Cache dir: {:?}", cache_config.cache_dir);
    info!(
        "Max cache size: {} MB, target: {} MB",
        cache_config.max_size_mb, cache_config.target_size_mb
    );
    info!("Clean interval: {} seconds", config.clean_interval.as_secs());

    let cache = Arc::new(CacheDirectory::new(cache_config)?);
    cache.init().await?;

    // Bring an oversized cache back under budget before serving
    let report = cache.clean_if_needed().await;
    info!(outcome = ?report.outcome, deleted = report.deleted.len(), "Startup cleanup done");

    let cleaner = cache.start_auto_cleaner(config.clean_interval)?;

    let state: SharedState = Arc::new(ServerState::new(cache));
    let served = start_server(state, config.port, shutdown_signal()).await;

    info!("Shutting down auto-cleaner...");
    cleaner.shutdown().await;

    served?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        // Without a signal handler, keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
