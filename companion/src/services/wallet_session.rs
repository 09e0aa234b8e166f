//! # Wallet Session Manager
//!
//! Owns the connection to the wallet provider: detection, the silent
//! existing-connection check and the prompting `connect` flow. Ledger reloads
//! after a connection are triggered by the session context.

use crate::app::events::{EventSink, SessionEvent};
use crate::app::generation::Generation;
use crate::app::state::SessionState;
use crate::core::SessionError;
use lib_eth::{ProviderError, WalletProvider};
use parking_lot::RwLock;
use std::sync::Arc;

pub struct WalletSessionManager {
    provider: Arc<dyn WalletProvider>,
    state: Arc<RwLock<SessionState>>,
    events: EventSink,
    generation: Generation,
}

impl WalletSessionManager {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        state: Arc<RwLock<SessionState>>,
        events: EventSink,
        generation: Generation,
    ) -> Self {
        Self {
            provider,
            state,
            events,
            generation,
        }
    }

    pub fn provider(&self) -> &Arc<dyn WalletProvider> {
        &self.provider
    }

    /// Record whether a provider exists. Absence raises the persistent
    /// `ProviderAbsent` error and leaves the account empty.
    pub fn detect_provider(&self) -> bool {
        let installed = self.provider.is_present();
        {
            let mut state = self.state.write();
            state.provider_installed = installed;
            if !installed {
                state.account = None;
                state.error = Some(SessionError::ProviderAbsent);
            }
        }

        self.events.emit(SessionEvent::ProviderDetected(installed));
        if installed {
            tracing::info!("Wallet provider detected");
        } else {
            tracing::info!("No wallet provider - running with sample data");
            self.events.emit(SessionEvent::ErrorRaised(SessionError::ProviderAbsent));
        }
        installed
    }

    /// Adopt an already-authorized account without prompting.
    ///
    /// Returns the account when one was found; the caller reloads the ledger.
    pub async fn check_existing_connection(&self) -> Option<String> {
        if !self.provider.is_present() {
            self.set_error(SessionError::ProviderAbsent);
            return None;
        }

        let token = self.generation.current();
        let result = self.provider.request_accounts(false).await;
        if !self.generation.is_current(token) {
            tracing::debug!("Discarding connection check from a previous session");
            return None;
        }

        match result {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(account) => {
                    tracing::info!(account = %shared::shorten_address(&account), "Existing wallet connection found");
                    self.set_account(account.clone());
                    Some(account)
                }
                None => {
                    tracing::debug!("No authorized accounts");
                    None
                }
            },
            Err(ProviderError::NotInstalled) => {
                self.set_error(SessionError::ProviderAbsent);
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Connection check failed");
                self.set_error(SessionError::ConnectionCheckFailed);
                None
            }
        }
    }

    /// Prompt the provider for account access.
    ///
    /// Suspends until the user answers the prompt; there is no timeout.
    pub async fn connect(&self) -> Result<String, SessionError> {
        if !self.provider.is_present() {
            self.set_error(SessionError::ProviderAbsent);
            return Err(SessionError::ProviderAbsent);
        }

        let token = self.generation.current();
        {
            let mut state = self.state.write();
            state.error = None;
            state.connecting = true;
        }
        self.events.emit(SessionEvent::ErrorCleared);

        let result = self.provider.request_accounts(true).await;
        if !self.generation.is_current(token) {
            tracing::debug!("Discarding connect result from a previous session");
            return Err(SessionError::ConnectFailed);
        }
        self.state.write().connecting = false;

        let error = match result {
            Ok(accounts) => match accounts.into_iter().next() {
                Some(account) => {
                    tracing::info!(account = %shared::shorten_address(&account), "Wallet connected");
                    self.set_account(account.clone());
                    return Ok(account);
                }
                None => SessionError::NoAccounts,
            },
            Err(e) => {
                let error = SessionError::from_connect(&e);
                tracing::warn!(error = %e, "Wallet connection failed");
                error
            }
        };

        self.set_error(error.clone());
        Err(error)
    }

    /// Clear the error surface.
    pub fn dismiss_error(&self) {
        let cleared = self.state.write().error.take().is_some();
        if cleared {
            self.events.emit(SessionEvent::ErrorCleared);
        }
    }

    fn set_account(&self, account: String) {
        let changed = {
            let mut state = self.state.write();
            let changed = state.account.as_deref() != Some(account.as_str());
            state.account = Some(account.clone());
            changed
        };
        if changed {
            self.events.emit(SessionEvent::AccountChanged(Some(account)));
        }
    }

    fn set_error(&self, error: SessionError) {
        self.state.write().error = Some(error.clone());
        self.events.emit(SessionEvent::ErrorRaised(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events;
    use crate::services::testing::MockProvider;
    use lib_eth::AbsentProvider;

    fn fixture(provider: Arc<dyn WalletProvider>) -> (WalletSessionManager, Arc<RwLock<SessionState>>) {
        let state = Arc::new(RwLock::new(SessionState::default()));
        let (sink, _rx) = events::channel();
        let manager = WalletSessionManager::new(provider, Arc::clone(&state), sink, Generation::new());
        (manager, state)
    }

    #[tokio::test]
    async fn test_connect_without_provider_sets_provider_absent() {
        let (manager, state) = fixture(Arc::new(AbsentProvider));

        assert!(!manager.detect_provider());
        let err = manager.connect().await.unwrap_err();

        assert_eq!(err, SessionError::ProviderAbsent);
        let state = state.read();
        assert_eq!(state.account, None);
        assert_eq!(state.error, Some(SessionError::ProviderAbsent));
    }

    #[tokio::test]
    async fn test_connect_sets_account() {
        let provider = MockProvider::with_accounts(&["0xabc0000000000000000000000000000000000001"]);
        let (manager, state) = fixture(Arc::new(provider));

        let account = manager.connect().await.unwrap();
        assert_eq!(account, "0xabc0000000000000000000000000000000000001");
        let state = state.read();
        assert_eq!(state.account.as_deref(), Some(account.as_str()));
        assert!(!state.connecting);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_connect_rejected_and_pending() {
        let provider = MockProvider::failing_prompt(ProviderError::UserRejected);
        let (manager, state) = fixture(Arc::new(provider));
        assert_eq!(manager.connect().await.unwrap_err(), SessionError::UserRejected);
        assert_eq!(state.read().account, None);

        let provider = MockProvider::failing_prompt(ProviderError::RequestPending);
        let (manager, state) = fixture(Arc::new(provider));
        assert_eq!(manager.connect().await.unwrap_err(), SessionError::RequestPending);
        assert_eq!(state.read().error, Some(SessionError::RequestPending));
    }

    #[tokio::test]
    async fn test_connect_with_no_accounts() {
        let (manager, _state) = fixture(Arc::new(MockProvider::with_accounts(&[])));
        assert_eq!(manager.connect().await.unwrap_err(), SessionError::NoAccounts);
    }

    #[tokio::test]
    async fn test_connect_clears_previous_error() {
        let provider = MockProvider::with_accounts(&["0xabc0000000000000000000000000000000000001"]);
        let (manager, state) = fixture(Arc::new(provider));
        state.write().error = Some(SessionError::UserRejected);

        manager.connect().await.unwrap();
        assert_eq!(state.read().error, None);
    }

    #[tokio::test]
    async fn test_check_existing_connection_is_silent() {
        let provider = MockProvider::with_accounts(&["0xabc0000000000000000000000000000000000001"]);
        let prompts = provider.prompts();
        let (manager, state) = fixture(Arc::new(provider));

        let account = manager.check_existing_connection().await;
        assert!(account.is_some());
        assert_eq!(prompts.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert!(state.read().is_connected());
    }

    #[tokio::test]
    async fn test_dismiss_error() {
        let (manager, state) = fixture(Arc::new(MockProvider::failing_prompt(ProviderError::UserRejected)));
        let _ = manager.connect().await;
        manager.dismiss_error();
        assert_eq!(state.read().error, None);
    }
}
