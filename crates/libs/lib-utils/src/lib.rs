//! # Utilities Library
//!
//! Shared utility functions for environment variables, time display and input validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env_opt, get_env_or, get_env_parse_or};
pub use time::{format_local_date, format_local_time, format_local_timestamp, now_unix};
pub use validation::{validate_email, validate_hex_address, validate_not_empty};
