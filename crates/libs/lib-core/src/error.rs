//! # Centralized Error Handling
//!
//! This module defines the error type [`AppError`] shared by the library crates.
//! It follows the `thiserror` pattern for ergonomic error handling.
//!
//! ## Error Categories
//!
//! 1. **Environment** - startup and local state
//!    - [`Config`](AppError::Config), [`Storage`](AppError::Storage)
//! 2. **External services** - wallet provider, contract, HTTP APIs
//!    - [`Rpc`](AppError::Rpc), [`Provider`](AppError::Provider),
//!      [`Contract`](AppError::Contract), [`Transaction`](AppError::Transaction)
//! 3. **Data** - user input and wire formats
//!    - [`InvalidInput`](AppError::InvalidInput), [`Decoding`](AppError::Decoding),
//!      [`NotFound`](AppError::NotFound), [`Internal`](AppError::Internal)
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn parse_amount(amount: &str) -> Result<f64> {
//!     amount
//!         .parse()
//!         .map_err(|_| AppError::InvalidInput(format!("Invalid amount: {amount}")))
//! }
//! ```

use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON-RPC or HTTP transport failure (network, timeout, non-success status).
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Wallet provider refused or failed a request.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Contract call reverted or no contract at the configured address.
    #[error("Contract error: {0}")]
    Contract(String),

    /// Transaction building, broadcast or confirmation failure.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Malformed response payload.
    #[error("Decoding error: {0}")]
    Decoding(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Durable state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// User-friendly message. Transport and internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Provider(msg) => msg.clone(),
            AppError::Transaction(msg) => msg.clone(),
            AppError::Contract(_) => "Contract not available on this network".to_string(),
            AppError::Rpc(_) => "Service temporarily unavailable".to_string(),
            AppError::Config(_)
            | AppError::Storage(_)
            | AppError::Internal(_)
            | AppError::Decoding(_) => "An internal error occurred".to_string(),
        }
    }

    /// Transient failures a later user action might succeed on.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Rpc(_))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decoding(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
