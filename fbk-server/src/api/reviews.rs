//! Review submission and listing API handlers

use axum::{
    extract::{ConnectInfo, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::db::reviews::MAX_PAGE_SIZE;
use crate::error::ApiResult;
use crate::models::ReviewRecord;
use crate::rate_limit::origin_from_request;
use crate::services::pipeline;
use crate::AppState;

/// Default page size when the listing query omits `limit`
const DEFAULT_PAGE_SIZE: i64 = 50;

/// POST /reviews response
#[derive(Debug, Serialize)]
pub struct SubmitReviewResponse {
    pub success: bool,
    pub data: ReviewRecord,
}

/// GET /reviews query parameters
#[derive(Debug, Deserialize)]
pub struct ListReviewsQuery {
    pub rating: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /reviews response
#[derive(Debug, Serialize)]
pub struct ListReviewsResponse {
    pub success: bool,
    pub data: Vec<ReviewRecord>,
    pub meta: ListMeta,
}

/// Listing page metadata
#[derive(Debug, Serialize)]
pub struct ListMeta {
    /// Number of rows in this page
    pub count: usize,
    /// Effective (clamped) page size
    pub limit: i64,
    pub offset: i64,
}

/// POST /reviews
///
/// Accepts the raw JSON body so that malformed rating values reach the
/// validator rather than failing deserialization with a generic message.
/// The peer address is optional because the router may be driven without
/// connect info (tests); the origin then falls back per the rate-limit
/// derivation rules.
pub async fn submit_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    Json(body): Json<serde_json::Value>,
) -> ApiResult<Json<SubmitReviewResponse>> {
    let origin = origin_from_request(&headers, connect_info.map(|ConnectInfo(addr)| addr));

    let record = pipeline::process_submission(
        &state.db,
        &state.event_bus,
        state.completions.as_ref(),
        &state.rate_limit,
        &body,
        origin,
    )
    .await?;

    Ok(Json(SubmitReviewResponse {
        success: true,
        data: record,
    }))
}

/// GET /reviews
///
/// Newest-first listing with optional exact-rating filter and offset
/// pagination. The page size is clamped to the store's hard cap.
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ListReviewsQuery>,
) -> ApiResult<Json<ListReviewsResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(0, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let records =
        crate::db::reviews::list_reviews(&state.db, query.rating, limit, offset).await?;

    Ok(Json(ListReviewsResponse {
        success: true,
        meta: ListMeta {
            count: records.len(),
            limit,
            offset,
        },
        data: records,
    }))
}
