//! Per-origin submission rate limiting
//!
//! Sliding-window accounting over the `reviews` table: a submission is
//! rejected when its origin already has `max_submissions` rows inside the
//! trailing window. The count and the eventual insert are separate
//! round-trips, so concurrent bursts from one origin can transiently
//! overshoot the quota; that bound is best-effort. If the count query
//! itself fails the check allows the submission (fail-open) and logs a
//! warning, so a degraded database never silences the feedback channel.

use axum::http::HeaderMap;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use tracing::{debug, warn};

use crate::db::reviews::count_recent_submissions;
use crate::error::ApiError;

/// Rate-limit settings, resolved from configuration at startup
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Trailing window length in minutes
    pub window_minutes: i64,
    /// Maximum submissions per origin per window
    pub max_submissions: i64,
}

/// Derive the origin identifier from request metadata
///
/// First entry of `X-Forwarded-For` wins, then the peer address of the
/// connection, then `"unknown"`. The identifier is used only for rate-limit
/// accounting and never leaves the server.
pub fn origin_from_request(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

/// Check an origin against the sliding-window quota
///
/// Returns `Err(ApiError::RateLimited)` when the quota is met or exceeded.
/// A count-query failure allows the submission through.
pub async fn check(
    pool: &SqlitePool,
    origin: &str,
    config: &RateLimitConfig,
) -> Result<(), ApiError> {
    match count_recent_submissions(pool, origin, config.window_minutes).await {
        Ok(count) if count >= config.max_submissions => {
            debug!(
                origin = %origin,
                count = count,
                quota = config.max_submissions,
                "Submission rejected by rate limit"
            );
            Err(ApiError::RateLimited)
        }
        Ok(_) => Ok(()),
        Err(e) => {
            warn!(
                origin = %origin,
                error = %e,
                "Rate-limit count query failed; allowing submission"
            );
            Ok(())
        }
    }
}
