//! # Core Library
//!
//! Configuration, error type and durable key/value state for the companion.

pub mod config;
pub mod error;
pub mod model;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
pub use model::store::{FileStore, KeyValueStore, MemoryStore, TRANSACTION_COUNT_KEY};
