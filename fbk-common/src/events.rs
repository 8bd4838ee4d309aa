//! Event types and broadcast bus for the feedback review service
//!
//! The bus is the change-notification side channel: the submission pipeline
//! publishes a `ReviewCreated` event after each successful insert, and the
//! SSE endpoint forwards it to connected dashboard clients. Delivery is
//! lossy and out-of-band of the insert's own success or failure.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Feedback service event types
///
/// Events are broadcast via [`EventBus`] and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeedbackEvent {
    /// A new review record was persisted
    ///
    /// Triggers:
    /// - SSE: prepend the new row on connected dashboards
    ReviewCreated {
        /// Identifier of the new record
        review_id: Uuid,
        /// Rating of the new record (1 to 5)
        rating: i64,
        /// When the record was created
        created_at: chrono::DateTime<chrono::Utc>,
    },
}

impl FeedbackEvent {
    /// Get event type as string for SSE event naming and filtering
    pub fn event_type(&self) -> &str {
        match self {
            FeedbackEvent::ReviewCreated { .. } => "ReviewCreated",
        }
    }
}

/// Central event distribution bus
///
/// Uses tokio::broadcast internally, providing:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Automatic cleanup when subscribers drop
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<FeedbackEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with the given channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedbackEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// Notification delivery is best-effort: a missing dashboard must never
    /// affect the submission that produced the event.
    pub fn emit_lossy(&self, event: FeedbackEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
