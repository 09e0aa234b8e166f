//! # Logging
//!
//! File-based structured logging for the companion.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (takes precedence)
//! - `XCRYPT_LOG_LEVEL`: Log level filter when `RUST_LOG` is unset (default: `companion=info,lib_eth=info,warn`)
//! - `XCRYPT_LOG_DIR`: Directory for the daily-rotated log (default: `logs`)

pub mod config;
pub mod logger;

pub use config::LogConfig;
pub use logger::init as init_logger;
