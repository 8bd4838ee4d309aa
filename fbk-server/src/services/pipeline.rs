//! Review submission pipeline
//!
//! Sequences a submission through validate -> sanitize -> rate-limit ->
//! generate -> persist. The three completion calls run concurrently and the
//! pipeline commits nothing unless all three succeed: a failed submission
//! leaves no partial record. After a successful insert a `ReviewCreated`
//! event is published on the bus; delivery is lossy and has no bearing on
//! the submission's outcome.

use sqlx::SqlitePool;
use std::future::Future;
use tracing::info;

use fbk_common::events::{EventBus, FeedbackEvent};

use crate::error::ApiError;
use crate::models::{NewReview, ReviewRecord};
use crate::rate_limit::{self, RateLimitConfig};
use crate::services::completion::{CompletionClient, CompletionError};
use crate::services::prompts;
use crate::validators::{rating, review_text};

/// Completion backend used by the pipeline
///
/// Abstracted so tests can substitute a stub for the live client.
pub trait Completions: Send + Sync {
    /// Generate a completion for one prompt
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, CompletionError>> + Send;
}

impl Completions for CompletionClient {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, CompletionError>> + Send {
        CompletionClient::complete(self, prompt)
    }
}

/// Process one review submission end to end
///
/// `body` is the raw JSON request body; rating and review are pulled out
/// of it so malformed values fail validation instead of deserialization.
/// Fan-in is fail-fast: the first completion failure resolves the
/// submission and the sibling futures are dropped.
pub async fn process_submission<C: Completions>(
    pool: &SqlitePool,
    event_bus: &EventBus,
    completions: &C,
    rate_limit_config: &RateLimitConfig,
    body: &serde_json::Value,
    origin: String,
) -> Result<ReviewRecord, ApiError> {
    let rating = rating::validate(body.get("rating"))?;
    let review_text = review_text::sanitize(body.get("review"));

    rate_limit::check(pool, &origin, rate_limit_config).await?;

    let prompts = prompts::build(rating, &review_text);
    let (ai_response, ai_summary, ai_recommended_action) = tokio::try_join!(
        completions.complete(&prompts.customer_response),
        completions.complete(&prompts.internal_summary),
        completions.complete(&prompts.recommended_action),
    )?;

    let record = crate::db::reviews::insert_review(
        pool,
        &NewReview {
            rating,
            review_text,
            ai_response,
            ai_summary,
            ai_recommended_action,
            client_ip: origin,
        },
    )
    .await?;

    event_bus.emit_lossy(FeedbackEvent::ReviewCreated {
        review_id: record.id,
        rating: record.rating,
        created_at: record.created_at,
    });

    info!(
        review_id = %record.id,
        rating = record.rating,
        "Review submission processed"
    );

    Ok(record)
}
