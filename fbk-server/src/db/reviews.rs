//! Review record database operations
//!
//! Append-only: records are created exactly once and never mutated or
//! deleted. Timestamps are stored as RFC 3339 UTC with fixed microsecond
//! precision so lexicographic order equals chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;
use fbk_common::Result;

use crate::models::{NewReview, ReviewRecord};

/// Hard cap on listing page size, applied regardless of the requested limit
pub const MAX_PAGE_SIZE: i64 = 500;

/// Insert a new review record
///
/// Generates the identifier and creation timestamp server-side, then reads
/// the row back so the caller gets the canonical stored representation.
pub async fn insert_review(pool: &SqlitePool, review: &NewReview) -> Result<ReviewRecord> {
    let id = Uuid::new_v4();
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

    sqlx::query(
        r#"
        INSERT INTO reviews (
            id, rating, review_text, ai_response, ai_summary,
            ai_recommended_action, created_at, client_ip
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(review.rating)
    .bind(&review.review_text)
    .bind(&review.ai_response)
    .bind(&review.ai_summary)
    .bind(&review.ai_recommended_action)
    .bind(&created_at)
    .bind(&review.client_ip)
    .execute(pool)
    .await?;

    let row = sqlx::query(
        r#"
        SELECT id, rating, review_text, ai_response, ai_summary,
               ai_recommended_action, created_at, client_ip
        FROM reviews
        WHERE id = ?
        "#,
    )
    .bind(id.to_string())
    .fetch_one(pool)
    .await?;

    row_to_record(&row)
}

/// List review records, newest first
///
/// `rating` filters to an exact rating value when present. `limit` is
/// clamped to [`MAX_PAGE_SIZE`] no matter what the caller asked for.
pub async fn list_reviews(
    pool: &SqlitePool,
    rating: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<Vec<ReviewRecord>> {
    let limit = limit.clamp(0, MAX_PAGE_SIZE);
    let offset = offset.max(0);

    let rows = match rating {
        Some(rating) => {
            sqlx::query(
                r#"
                SELECT id, rating, review_text, ai_response, ai_summary,
                       ai_recommended_action, created_at, client_ip
                FROM reviews
                WHERE rating = ?
                ORDER BY created_at DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(rating)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                r#"
                SELECT id, rating, review_text, ai_response, ai_summary,
                       ai_recommended_action, created_at, client_ip
                FROM reviews
                ORDER BY created_at DESC
                LIMIT ? OFFSET ?
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    rows.iter().map(row_to_record).collect()
}

/// Count submissions from an origin within the trailing window
///
/// Rate-limit accounting query. The window is recomputed per check
/// (sliding), not bucketed.
pub async fn count_recent_submissions(
    pool: &SqlitePool,
    origin: &str,
    window_minutes: i64,
) -> Result<i64> {
    let cutoff = (Utc::now() - chrono::Duration::minutes(window_minutes))
        .to_rfc3339_opts(SecondsFormat::Micros, true);

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reviews WHERE client_ip = ? AND created_at > ?",
    )
    .bind(origin)
    .bind(cutoff)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Map a database row to a review record
fn row_to_record(row: &SqliteRow) -> Result<ReviewRecord> {
    let id: String = row.get("id");
    let id = Uuid::parse_str(&id)
        .map_err(|e| fbk_common::Error::Internal(format!("Failed to parse review id: {}", e)))?;

    let created_at: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| fbk_common::Error::Internal(format!("Failed to parse created_at: {}", e)))?
        .with_timezone(&Utc);

    Ok(ReviewRecord {
        id,
        rating: row.get("rating"),
        review_text: row.get("review_text"),
        ai_response: row.get("ai_response"),
        ai_summary: row.get("ai_summary"),
        ai_recommended_action: row.get("ai_recommended_action"),
        created_at,
        client_ip: row.get("client_ip"),
    })
}
