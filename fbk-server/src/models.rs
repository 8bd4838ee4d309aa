//! Data model for feedback records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted feedback record
///
/// Immutable after creation. `client_ip` is used only for rate-limit
/// accounting and is never serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: Uuid,
    pub rating: i64,
    pub review_text: String,
    pub ai_response: String,
    pub ai_summary: String,
    pub ai_recommended_action: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub client_ip: String,
}

/// Fully generated input for a single insert
///
/// Built by the pipeline once validation, sanitization, and all three
/// completions have succeeded.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub rating: i64,
    pub review_text: String,
    pub ai_response: String,
    pub ai_summary: String,
    pub ai_recommended_action: String,
    pub client_ip: String,
}
