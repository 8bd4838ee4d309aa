//! Database access for fbk-server
//!
//! SQLite via sqlx. One table, `reviews`, append-only.

pub mod reviews;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the reviews table and its indexes if they don't exist
///
/// Public so integration tests can prepare an in-memory pool.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id TEXT PRIMARY KEY,
            rating INTEGER NOT NULL,
            review_text TEXT NOT NULL,
            ai_response TEXT NOT NULL,
            ai_summary TEXT NOT NULL,
            ai_recommended_action TEXT NOT NULL,
            created_at TEXT NOT NULL,
            client_ip TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Listing orders by recency; rate limiting counts by origin within a window
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_created_at ON reviews (created_at)")
        .execute(pool)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_reviews_client_ip_created_at ON reviews (client_ip, created_at)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (reviews)");

    Ok(())
}
