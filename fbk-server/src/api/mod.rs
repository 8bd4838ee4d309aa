//! HTTP API handlers for fbk-server

pub mod events;
pub mod health;
pub mod reviews;

pub use events::review_event_stream;
pub use health::health_routes;
pub use reviews::{list_reviews, submit_review};
