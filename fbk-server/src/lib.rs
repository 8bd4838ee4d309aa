//! fbk-server library interface
//!
//! Exposes the application state and router builder for the binary and for
//! integration tests.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod services;
pub mod validators;

pub use crate::error::{ApiError, ApiResult};

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use fbk_common::events::EventBus;

use crate::rate_limit::RateLimitConfig;
use crate::services::completion::CompletionClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Completion API client
    pub completions: Arc<CompletionClient>,
    /// Rate-limit settings
    pub rate_limit: RateLimitConfig,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        event_bus: EventBus,
        completions: Arc<CompletionClient>,
        rate_limit: RateLimitConfig,
    ) -> Self {
        Self {
            db,
            event_bus,
            completions,
            rate_limit,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// The CORS layer echoes `Access-Control-Allow-Origin` only for origins on
/// the allow-list; all other cross-origin reads stay blocked by the
/// browser. An empty list allows nothing.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/reviews", post(api::submit_review).get(api::list_reviews))
        .route("/events", get(api::review_event_stream))
        .merge(api::health_routes())
        .layer(cors)
        .with_state(state)
}
