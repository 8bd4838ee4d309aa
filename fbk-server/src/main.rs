//! fbk-server - Customer Feedback Review Service
//!
//! Collects review submissions, generates AI feedback for each one, and
//! serves the listing and event stream the review dashboard reads.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fbk_common::events::EventBus;
use fbk_common::Config;
use fbk_server::rate_limit::RateLimitConfig;
use fbk_server::services::completion::CompletionClient;
use fbk_server::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting fbk-server (Customer Feedback Review Service)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve configuration (ENV with TOML fallback)
    let config = Config::load().map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
    info!("Database: {}", config.database_path.display());

    // Initialize database connection pool
    let db_pool = fbk_server::db::init_database_pool(&config.database_path).await?;
    info!("Database connection established");

    // Create event bus for SSE broadcasting
    let event_bus = EventBus::new(100); // 100 event capacity
    info!("Event bus initialized");

    // Completion API client
    let completions = Arc::new(CompletionClient::new(
        &config.completion_endpoint,
        &config.completion_api_key,
        &config.completion_model,
        config.completion_timeout_secs,
        config.completion_max_tokens,
    )?);
    info!(
        "Completion client initialized (model: {})",
        config.completion_model
    );

    // Create application state
    let state = AppState::new(
        db_pool,
        event_bus,
        completions,
        RateLimitConfig {
            window_minutes: config.rate_limit_window_minutes,
            max_submissions: config.rate_limit_max_submissions,
        },
    );

    // Build router
    let app = fbk_server::build_router(state, &config.allowed_origins);

    // Start server; connect info feeds the rate limiter's origin fallback
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
