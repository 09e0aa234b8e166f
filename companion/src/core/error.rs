//! # Session Errors
//!
//! What the user sees when a session operation fails. Display strings are the
//! messages shown in the error surface.
//!
//! | Variant | Recovery |
//! |---------|----------|
//! | `ProviderAbsent` | persistent; install a provider and restart |
//! | `UserRejected`, `RequestPending`, `ConnectFailed`, `NoAccounts` | dismissible; retry `connect` |
//! | `ContractUnavailable`, `NetworkFailure` | recovered locally: sample data for reads, last good snapshot for market polls |
//! | `SubmissionFailed`, `SubmissionInFlight`, `Validation` | returned to the caller of `submit_form` |

use lib_core::AppError;
use lib_eth::ProviderError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("MetaMask is not installed. Please install MetaMask to use this app.")]
    ProviderAbsent,

    #[error("Connection rejected. Please approve the connection in MetaMask.")]
    UserRejected,

    #[error("Connection request already pending. Please check MetaMask.")]
    RequestPending,

    #[error("Failed to connect wallet. Please try again.")]
    ConnectFailed,

    #[error("No accounts found. Please check your MetaMask connection.")]
    NoAccounts,

    #[error("Failed to check wallet connection.")]
    ConnectionCheckFailed,

    #[error("Failed to check transaction count.")]
    CountCheckFailed,

    #[error("Transactions contract is not deployed on this network.")]
    ContractUnavailable,

    #[error("Network error: {0}")]
    NetworkFailure(String),

    #[error("{0}")]
    Validation(String),

    #[error("A transaction is already being submitted.")]
    SubmissionInFlight,

    #[error("Transaction failed: {0}")]
    SubmissionFailed(String),

    #[error("Sign-in failed: {0}")]
    SignInFailed(String),
}

impl SessionError {
    /// Map a failed account prompt to what the user is told.
    pub fn from_connect(err: &ProviderError) -> Self {
        match err {
            ProviderError::NotInstalled => SessionError::ProviderAbsent,
            ProviderError::UserRejected => SessionError::UserRejected,
            ProviderError::RequestPending => SessionError::RequestPending,
            _ => SessionError::ConnectFailed,
        }
    }

    /// Map a failed submission step. The provider taxonomy is preserved for
    /// prompts the user can act on; everything else is a generic failure.
    pub fn from_submission(err: &ProviderError) -> Self {
        match err {
            ProviderError::NotInstalled => SessionError::ProviderAbsent,
            other => SessionError::SubmissionFailed(other.to_string()),
        }
    }

    /// Whether the error banner can be closed without changing the environment.
    pub fn is_dismissible(&self) -> bool {
        !matches!(self, SessionError::ProviderAbsent)
    }
}

impl From<AppError> for SessionError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidInput(msg) => SessionError::Validation(msg),
            AppError::Contract(_) => SessionError::ContractUnavailable,
            other => SessionError::NetworkFailure(other.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_error_mapping() {
        assert_eq!(SessionError::from_connect(&ProviderError::UserRejected), SessionError::UserRejected);
        assert_eq!(
            SessionError::from_connect(&ProviderError::RequestPending),
            SessionError::RequestPending
        );
        assert_eq!(
            SessionError::from_connect(&ProviderError::Transport("refused".into())),
            SessionError::ConnectFailed
        );
        assert_eq!(SessionError::from_connect(&ProviderError::NotInstalled), SessionError::ProviderAbsent);
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            SessionError::UserRejected.to_string(),
            "Connection rejected. Please approve the connection in MetaMask."
        );
        assert_eq!(SessionError::CountCheckFailed.to_string(), "Failed to check transaction count.");
        assert!(!SessionError::ProviderAbsent.is_dismissible());
        assert!(SessionError::ConnectFailed.is_dismissible());
    }

    #[test]
    fn test_app_error_mapping() {
        assert_eq!(
            SessionError::from(AppError::Rpc("connection refused".into())),
            SessionError::NetworkFailure("Service temporarily unavailable".into())
        );
        assert_eq!(
            SessionError::from(AppError::InvalidInput("Amount cannot be empty".into())),
            SessionError::Validation("Amount cannot be empty".into())
        );
    }
}
