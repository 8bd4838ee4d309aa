//! Submission pipeline integration tests
//!
//! Drives the pipeline with a stubbed completion backend to verify step
//! ordering, fan-out atomicity, and error mapping without any network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use sqlx::SqlitePool;

use fbk_common::events::{EventBus, FeedbackEvent};
use fbk_server::error::ApiError;
use fbk_server::rate_limit::RateLimitConfig;
use fbk_server::services::completion::CompletionError;
use fbk_server::services::pipeline::{process_submission, Completions};

/// Stub completion backend
///
/// Counts calls and fails any prompt containing `fail_on`.
struct StubCompletions {
    calls: Arc<AtomicUsize>,
    fail_on: Option<&'static str>,
    failure: fn() -> CompletionError,
}

impl StubCompletions {
    fn succeeding() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            fail_on: None,
            failure: || CompletionError::Api(500, "unused".to_string()),
        }
    }

    fn failing_on(substring: &'static str, failure: fn() -> CompletionError) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            fail_on: Some(substring),
            failure,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Completions for StubCompletions {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(substring) = self.fail_on {
            if prompt.contains(substring) {
                return Err((self.failure)());
            }
        }

        Ok(format!("generated: {}", &prompt[..prompt.len().min(40)]))
    }
}

async fn test_pool() -> SqlitePool {
    let pool = SqlitePool::connect(":memory:").await.unwrap();
    fbk_server::db::init_tables(&pool).await.unwrap();
    pool
}

fn limits() -> RateLimitConfig {
    RateLimitConfig {
        window_minutes: 60,
        max_submissions: 10,
    }
}

async fn row_count(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_successful_submission_persists_full_record() {
    let pool = test_pool().await;
    let bus = EventBus::new(10);
    let stub = StubCompletions::succeeding();

    let body = json!({ "rating": 5, "review": "Great service!" });
    let record = process_submission(&pool, &bus, &stub, &limits(), &body, "203.0.113.5".into())
        .await
        .unwrap();

    assert_eq!(record.rating, 5);
    assert_eq!(record.review_text, "Great service!");
    assert!(!record.ai_response.is_empty());
    assert!(!record.ai_summary.is_empty());
    assert!(!record.ai_recommended_action.is_empty());
    assert_eq!(stub.call_count(), 3);
    assert_eq!(row_count(&pool).await, 1);
}

#[tokio::test]
async fn test_successful_submission_emits_event() {
    let pool = test_pool().await;
    let bus = EventBus::new(10);
    let mut rx = bus.subscribe();
    let stub = StubCompletions::succeeding();

    let body = json!({ "rating": 4, "review": "Nice." });
    let record = process_submission(&pool, &bus, &stub, &limits(), &body, "203.0.113.5".into())
        .await
        .unwrap();

    let event = rx.try_recv().expect("event should be published");
    match event {
        FeedbackEvent::ReviewCreated { review_id, rating, .. } => {
            assert_eq!(review_id, record.id);
            assert_eq!(rating, 4);
        }
    }
}

#[tokio::test]
async fn test_one_completion_failure_persists_nothing() {
    let pool = test_pool().await;
    let bus = EventBus::new(10);
    let mut rx = bus.subscribe();
    let stub = StubCompletions::failing_on("internal summary", || {
        CompletionError::Api(503, "unavailable".to_string())
    });

    let body = json!({ "rating": 2, "review": "Slow delivery." });
    let result = process_submission(&pool, &bus, &stub, &limits(), &body, "203.0.113.5".into()).await;

    assert!(matches!(result, Err(ApiError::Processing(_))));
    assert_eq!(row_count(&pool).await, 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_upstream_throttle_maps_to_busy() {
    let pool = test_pool().await;
    let bus = EventBus::new(10);
    let stub =
        StubCompletions::failing_on("customer-facing response", || CompletionError::RateLimited);

    let body = json!({ "rating": 3, "review": "Fine." });
    let result = process_submission(&pool, &bus, &stub, &limits(), &body, "203.0.113.5".into()).await;

    assert!(matches!(result, Err(ApiError::UpstreamBusy)));
    assert_eq!(row_count(&pool).await, 0);
}

#[tokio::test]
async fn test_upstream_quota_maps_to_quota_exceeded() {
    let pool = test_pool().await;
    let bus = EventBus::new(10);
    let stub =
        StubCompletions::failing_on("follow-up action", || CompletionError::QuotaExceeded);

    let body = json!({ "rating": 3, "review": "Fine." });
    let result = process_submission(&pool, &bus, &stub, &limits(), &body, "203.0.113.5".into()).await;

    assert!(matches!(result, Err(ApiError::QuotaExceeded)));
    assert_eq!(row_count(&pool).await, 0);
}

#[tokio::test]
async fn test_invalid_rating_rejected_before_any_completion_call() {
    let pool = test_pool().await;
    let bus = EventBus::new(10);
    let stub = StubCompletions::succeeding();

    for body in [
        json!({ "rating": 7, "review": "x" }),
        json!({ "rating": 2.5, "review": "x" }),
        json!({ "rating": "five", "review": "x" }),
        json!({ "review": "x" }),
    ] {
        let result =
            process_submission(&pool, &bus, &stub, &limits(), &body, "203.0.113.5".into()).await;
        assert!(matches!(result, Err(ApiError::InvalidRating)));
    }

    assert_eq!(stub.call_count(), 0);
    assert_eq!(row_count(&pool).await, 0);
}

#[tokio::test]
async fn test_review_text_sanitized_before_persistence() {
    let pool = test_pool().await;
    let bus = EventBus::new(10);
    let stub = StubCompletions::succeeding();

    let body = json!({ "rating": 5, "review": "<script>alert(1)</script>hello" });
    let record = process_submission(&pool, &bus, &stub, &limits(), &body, "203.0.113.5".into())
        .await
        .unwrap();

    assert_eq!(record.review_text, "hello");
}

#[tokio::test]
async fn test_local_rate_limit_blocks_before_generation() {
    let pool = test_pool().await;
    let bus = EventBus::new(10);
    let config = RateLimitConfig {
        window_minutes: 60,
        max_submissions: 2,
    };

    let seeding = StubCompletions::succeeding();
    for _ in 0..2 {
        let body = json!({ "rating": 5, "review": "ok" });
        process_submission(&pool, &bus, &seeding, &config, &body, "203.0.113.5".into())
            .await
            .unwrap();
    }

    let stub = StubCompletions::succeeding();
    let body = json!({ "rating": 5, "review": "one too many" });
    let result = process_submission(&pool, &bus, &stub, &config, &body, "203.0.113.5".into()).await;

    assert!(matches!(result, Err(ApiError::RateLimited)));
    assert_eq!(stub.call_count(), 0);
    assert_eq!(row_count(&pool).await, 2);
}

#[tokio::test]
async fn test_rate_limit_infrastructure_failure_fails_open() {
    // No tables: the rate-limit count query fails, but the pipeline must
    // proceed to generation. The subsequent insert then fails as a
    // storage error.
    let pool = SqlitePool::connect(":memory:").await.unwrap();
    let bus = EventBus::new(10);
    let stub = StubCompletions::succeeding();

    let body = json!({ "rating": 5, "review": "ok" });
    let result = process_submission(&pool, &bus, &stub, &limits(), &body, "203.0.113.5".into()).await;

    assert_eq!(stub.call_count(), 3);
    assert!(matches!(result, Err(ApiError::Storage(_))));
}
