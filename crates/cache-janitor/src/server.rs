//! HTTP server for cache status and on-demand cleanup
//!
//! Provides /health, /api/stats, and POST /api/clean endpoints.

use crate::types::{CleanResponse, HealthResponse};
use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use bounded_dir_cache::{CacheDirectory, CacheStats};
use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared state for the HTTP server
pub struct ServerState {
    pub cache: Arc<CacheDirectory>,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(cache: Arc<CacheDirectory>) -> Self {
        Self {
            cache,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Create the HTTP router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stats", get(stats))
        .route("/api/clean", post(clean))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server, returning once `shutdown` resolves
pub async fn start_server(
    state: SharedState,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let router = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime_secs = (Utc::now() - state.started_at).num_seconds() as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs,
        size_mb: state.cache.current_size_mb().await,
        max_size_mb: state.cache.config().max_size_mb,
        auto_cleaner: state.cache.is_auto_cleaner_running(),
    })
}

/// Cache statistics endpoint
async fn stats(State(state): State<SharedState>) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}

/// Run one cleanup cycle and report what it did
async fn clean(State(state): State<SharedState>) -> Json<CleanResponse> {
    info!("Manual cleanup requested");
    let report = state.cache.clean_if_needed().await;

    Json(CleanResponse {
        evicted: report.evicted(),
        report,
    })
}
