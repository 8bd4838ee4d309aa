//! Common error types for the feedback review service

use thiserror::Error;

/// Common result type for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared between the foundation and server crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
