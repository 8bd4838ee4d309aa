//! Shared foundation for the feedback review service
//!
//! Provides the error taxonomy, configuration resolution, and the event bus
//! used by the server crate.

pub mod config;
pub mod error;
pub mod events;

pub use config::Config;
pub use error::{Error, Result};
