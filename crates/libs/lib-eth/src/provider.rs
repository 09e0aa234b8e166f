//! # Wallet Provider
//!
//! The wallet provider grants access to the user's account for signing and
//! broadcasting. The companion never holds keys; everything goes through
//! [`WalletProvider`].
//!
//! ## Error Codes
//!
//! Provider failures are classified from their JSON-RPC / EIP-1193 codes:
//!
//! | Code | Meaning | Variant |
//! |------|---------|---------|
//! | `4001` | user rejected the prompt | [`ProviderError::UserRejected`] |
//! | `-32002` | a prompt is already open | [`ProviderError::RequestPending`] |
//! | `3` / "execution reverted" | call reverted | [`ProviderError::CallException`] |

use crate::rpc::RpcWalletProvider;
use crate::types::TransactionRequest;
use alloy_primitives::B256;
use async_trait::async_trait;
use lib_core::AppError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const USER_REJECTED_CODE: i64 = 4001;
pub const REQUEST_PENDING_CODE: i64 = -32002;
pub const EXECUTION_REVERTED_CODE: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Wallet provider is not installed")]
    NotInstalled,

    #[error("User rejected the request")]
    UserRejected,

    #[error("A request is already pending in the wallet")]
    RequestPending,

    /// The call reverted or there is no contract at the target address.
    #[error("Call exception: {0}")]
    CallException(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Network-level failure: connection, timeout, non-JSON response.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Timed out waiting for confirmation of {0}")]
    ConfirmationTimeout(B256),
}

impl ProviderError {
    /// Classify a JSON-RPC error object.
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            USER_REJECTED_CODE => ProviderError::UserRejected,
            REQUEST_PENDING_CODE => ProviderError::RequestPending,
            EXECUTION_REVERTED_CODE => ProviderError::CallException(message),
            _ if message.to_ascii_lowercase().contains("revert") => {
                ProviderError::CallException(message)
            }
            _ => ProviderError::Rpc { code, message },
        }
    }

    /// Reverted call or missing contract.
    pub fn is_call_exception(&self) -> bool {
        matches!(self, ProviderError::CallException(_))
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotInstalled
            | ProviderError::UserRejected
            | ProviderError::RequestPending => AppError::Provider(err.to_string()),
            ProviderError::CallException(msg) => AppError::Contract(msg),
            ProviderError::Rpc { .. } | ProviderError::Transport(_) => AppError::Rpc(err.to_string()),
            ProviderError::Decode(msg) => AppError::Decoding(msg),
            ProviderError::ConfirmationTimeout(_) => AppError::Transaction(err.to_string()),
        }
    }
}

/// Access to the user's account (EIP-1193 semantics).
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Whether a provider exists in this environment at all.
    fn is_present(&self) -> bool;

    /// Authorized accounts. `prompting == false` never shows UI (`eth_accounts`);
    /// `prompting == true` may suspend until the user answers (`eth_requestAccounts`).
    async fn request_accounts(&self, prompting: bool) -> Result<Vec<String>, ProviderError>;

    /// Broadcast a transaction from an authorized account. May prompt the user.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<B256, ProviderError>;
}

/// Stand-in used when no provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbsentProvider;

#[async_trait]
impl WalletProvider for AbsentProvider {
    fn is_present(&self) -> bool {
        false
    }

    async fn request_accounts(&self, _prompting: bool) -> Result<Vec<String>, ProviderError> {
        Err(ProviderError::NotInstalled)
    }

    async fn send_transaction(&self, _tx: TransactionRequest) -> Result<B256, ProviderError> {
        Err(ProviderError::NotInstalled)
    }
}

/// Look for a provider in the environment: an RPC endpoint when one is configured,
/// [`AbsentProvider`] otherwise.
pub fn detect_provider(rpc_url: Option<&str>, timeout: Duration) -> Arc<dyn WalletProvider> {
    match rpc_url {
        Some(url) => match RpcWalletProvider::new(url, timeout) {
            Ok(provider) => {
                tracing::info!(rpc_url = %url, "Wallet provider detected");
                Arc::new(provider)
            }
            Err(e) => {
                tracing::warn!(rpc_url = %url, error = %e, "Wallet provider unusable - treating as not installed");
                Arc::new(AbsentProvider)
            }
        },
        None => {
            tracing::info!("No wallet provider configured");
            Arc::new(AbsentProvider)
        }
    }
}
