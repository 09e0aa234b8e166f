//! # Session Context
//!
//! One explicit object holding the whole session: wallet connection, ledger
//! history, transfer draft, market data and explorer preview. Consumers hold a
//! reference and go through its operations; nothing else mutates the state.
//!
//! ## Initialization order
//!
//! ```text
//! restore cached count ─▶ detect provider ─▶ check existing connection
//!                     ─▶ load history ─▶ check transaction count ─▶ explorer
//! ```
//!
//! After a confirmed submission the context resynchronises explicitly: ledger
//! and count are re-read, the draft is cleared and [`SessionEvent::Resynced`] is
//! emitted once.

use super::events::{self, EventSink, SessionEvent};
use super::generation::Generation;
use super::state::{MarketState, SessionState};
use crate::core::{AuthService, AuthUser, ExplorerService, MarketService, SessionError};
use crate::services::auth::{validate_credentials, IDENTITY_TOOLKIT_URL};
use crate::services::{
    EthConverter, ExplorerHistory, ExplorerState, IdentityToolkitClient, LedgerReader, MarketPoller,
    Submission, TransactionSubmitter, Transfer, WalletSessionManager,
};
use alloy_primitives::Address;
use lib_core::{Config, FileStore, KeyValueStore};
use lib_eth::{
    detect_provider, CoinGeckoClient, EtherscanClient, RpcTransactionsContract, TransactionsContract,
    WalletProvider,
};
use parking_lot::RwLock;
use shared::{Ether, FormField, History};
use std::sync::Arc;
use std::time::Duration;

/// External collaborators of a session.
#[derive(Clone)]
pub struct Collaborators {
    pub provider: Arc<dyn WalletProvider>,
    /// `None` when no contract is configured.
    pub contract: Option<Arc<dyn TransactionsContract>>,
    pub market: Arc<dyn MarketService>,
    pub explorer: Arc<dyn ExplorerService>,
    /// `None` when sign-in is not configured.
    pub auth: Option<Arc<dyn AuthService>>,
    pub store: Arc<dyn KeyValueStore>,
}

impl Collaborators {
    /// Build the real collaborators described by `config`.
    pub fn from_config(config: &Config) -> lib_core::Result<Self> {
        let timeout = config.http_timeout();
        let provider = detect_provider(config.rpc_url.as_deref(), timeout);

        let contract: Option<Arc<dyn TransactionsContract>> =
            match (config.rpc_url.as_deref(), config.contract_address.as_deref()) {
                (Some(rpc_url), Some(address)) => {
                    let address: Address = address.parse().map_err(|e| {
                        lib_core::AppError::Config(format!("Invalid contract address {}: {}", address, e))
                    })?;
                    Some(Arc::new(RpcTransactionsContract::new(
                        rpc_url,
                        address,
                        timeout,
                        config.confirmation_poll(),
                        config.confirmation_timeout(),
                    )?))
                }
                _ => None,
            };

        let auth: Option<Arc<dyn AuthService>> = match config.auth_api_key.as_deref() {
            Some(key) => Some(Arc::new(IdentityToolkitClient::new(IDENTITY_TOOLKIT_URL, key, timeout)?)),
            None => None,
        };

        Ok(Self {
            provider,
            contract,
            market: Arc::new(CoinGeckoClient::new(&config.market_api_url, timeout)?),
            explorer: Arc::new(EtherscanClient::new(
                &config.explorer_api_url,
                config.explorer_api_key.clone(),
                timeout,
            )?),
            auth,
            store: Arc::new(FileStore::open(&config.state_file)),
        })
    }
}

/// Session settings that are not collaborators.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub poll_interval: Duration,
    /// Address whose explorer history is previewed.
    pub explorer_address: String,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            explorer_address: config.explorer_address.clone(),
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            explorer_address: lib_core::config::DEFAULT_EXPLORER_ADDRESS.to_string(),
        }
    }
}

pub struct SessionContext {
    state: Arc<RwLock<SessionState>>,
    events: EventSink,
    events_rx: async_channel::Receiver<SessionEvent>,
    generation: Generation,
    wallet: WalletSessionManager,
    ledger: Arc<LedgerReader>,
    submitter: TransactionSubmitter,
    poller: MarketPoller,
    explorer: ExplorerHistory,
    converter: EthConverter,
    auth: Option<Arc<dyn AuthService>>,
}

impl SessionContext {
    pub fn new(collaborators: Collaborators, options: SessionOptions) -> Self {
        let Collaborators {
            provider,
            contract,
            market,
            explorer,
            auth,
            store,
        } = collaborators;

        let state = Arc::new(RwLock::new(SessionState::default()));
        let (sink, events_rx) = events::channel();
        let generation = Generation::new();

        let wallet = WalletSessionManager::new(
            Arc::clone(&provider),
            Arc::clone(&state),
            sink.clone(),
            generation.clone(),
        );
        let ledger = Arc::new(LedgerReader::new(
            Arc::clone(&provider),
            contract.clone(),
            store,
            Arc::clone(&state),
            sink.clone(),
            generation.clone(),
        ));
        let submitter = TransactionSubmitter::new(
            provider,
            contract,
            Arc::clone(&ledger),
            Arc::clone(&state),
            sink.clone(),
            generation.clone(),
        );
        let poller = MarketPoller::new(
            Arc::clone(&market),
            Arc::new(RwLock::new(MarketState::default())),
            sink.clone(),
            generation.clone(),
            options.poll_interval,
        );

        Self {
            state,
            explorer: ExplorerHistory::new(explorer, options.explorer_address, sink.clone(), generation.clone()),
            converter: EthConverter::new(market),
            events: sink,
            events_rx,
            generation,
            wallet,
            ledger,
            submitter,
            poller,
            auth,
        }
    }

    /// Build a session from configuration.
    pub fn from_config(config: &Config) -> lib_core::Result<Self> {
        Ok(Self::new(
            Collaborators::from_config(config)?,
            SessionOptions::from_config(config),
        ))
    }

    /// Receiver for session events. Every clone competes for the same events.
    pub fn events(&self) -> async_channel::Receiver<SessionEvent> {
        self.events_rx.clone()
    }

    // region: --- Lifecycle

    /// Bring the session up in order.
    pub async fn initialize(&self) {
        tracing::info!("Initializing session");
        self.ledger.restore_transaction_count();

        if self.wallet.detect_provider() {
            self.wallet.check_existing_connection().await;
        }
        self.ledger.load_history().await;
        // Failure is recorded in the error surface
        let _ = self.ledger.check_transaction_count().await;
        self.explorer.refresh(self.is_connected()).await;

        let state = self.state.read();
        tracing::info!(
            provider = state.provider_installed,
            connected = state.is_connected(),
            source = ?state.history.source,
            "Session initialized"
        );
    }

    /// Stop background work and discard results of calls still in flight.
    pub fn teardown(&self) {
        let generation = self.generation.advance();
        self.poller.stop();
        tracing::info!(generation, "Session torn down");
    }

    // endregion: --- Lifecycle

    // region: --- Wallet

    /// Prompt for account access, then reload the ledger and explorer preview.
    /// A failed reload never fails the connection.
    pub async fn connect(&self) -> Result<String, SessionError> {
        let account = self.wallet.connect().await?;
        self.ledger.load_history().await;
        self.explorer.refresh(true).await;
        Ok(account)
    }

    pub fn dismiss_error(&self) {
        self.wallet.dismiss_error();
    }

    // endregion: --- Wallet

    // region: --- Ledger

    pub async fn load_history(&self) -> History {
        self.ledger.load_history().await
    }

    pub async fn check_transaction_count(&self) -> Result<Option<u64>, SessionError> {
        self.ledger.check_transaction_count().await
    }

    /// Replace exactly one field of the draft.
    pub fn update_form(&self, field: FormField, value: impl Into<String>) {
        self.state.write().form.set(field, value);
    }

    /// Validate the draft and submit it. On success the ledger is resynchronised
    /// and the draft cleared; on failure nothing changes.
    pub async fn submit_form(&self) -> Result<Submission, SessionError> {
        let transfer = self.validated_transfer()?;
        let submission = self.submitter.submit(transfer).await?;
        self.resync().await;
        Ok(submission)
    }

    fn validated_transfer(&self) -> Result<Transfer, SessionError> {
        let (form, account, installed) = {
            let state = self.state.read();
            (state.form.clone(), state.account.clone(), state.provider_installed)
        };

        let missing = form.missing_fields();
        if !missing.is_empty() {
            let names: Vec<_> = missing.iter().map(|f| f.label()).collect();
            return Err(SessionError::Validation(format!("Missing: {}", names.join(", "))));
        }
        if !installed {
            return Err(SessionError::ProviderAbsent);
        }
        let account = account.ok_or(SessionError::NoAccounts)?;

        let from: Address = account
            .parse()
            .map_err(|_| SessionError::Validation(format!("Invalid account: {}", account)))?;
        let address_to = form.address_to.trim();
        lib_utils::validate_hex_address(address_to).map_err(SessionError::Validation)?;
        let to: Address = address_to
            .parse()
            .map_err(|_| SessionError::Validation(format!("Invalid address: {}", address_to)))?;

        let amount = Ether::parse(&form.amount)
            .map_err(|_| SessionError::Validation(format!("Invalid amount: {}", form.amount.trim())))?;
        if amount == Ether::ZERO {
            return Err(SessionError::Validation("Amount must be greater than zero".to_string()));
        }

        Ok(Transfer {
            from,
            to,
            amount,
            keyword: form.keyword.trim().to_string(),
            message: form.message.trim().to_string(),
        })
    }

    /// Re-read ledger and count, clear the draft.
    pub async fn resync(&self) {
        self.ledger.load_history().await;
        let _ = self.ledger.check_transaction_count().await;
        self.state.write().form.clear();
        self.events.emit(SessionEvent::Resynced);
        tracing::info!("Session resynchronised");
    }

    // endregion: --- Ledger

    // region: --- Market

    pub fn start_market_polling(&self) {
        self.poller.start();
    }

    pub fn stop_market_polling(&self) {
        self.poller.stop();
    }

    /// Manual refresh; `false` when a fetch was already in flight.
    pub async fn refresh_market(&self) -> bool {
        self.poller.refresh().await
    }

    pub fn market(&self) -> MarketState {
        self.poller.state()
    }

    pub fn load_more_market(&self) {
        self.poller.load_more();
    }

    pub fn converter(&self) -> &EthConverter {
        &self.converter
    }

    // endregion: --- Market

    // region: --- Explorer

    pub async fn refresh_explorer(&self) -> ExplorerState {
        self.explorer.refresh(self.is_connected()).await
    }

    pub fn explorer(&self) -> ExplorerState {
        self.explorer.state()
    }

    // endregion: --- Explorer

    // region: --- Auth

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, SessionError> {
        validate_credentials(email, password).map_err(SessionError::Validation)?;
        let auth = self
            .auth
            .as_ref()
            .ok_or_else(|| SessionError::SignInFailed("sign-in is not configured".to_string()))?;

        match auth.sign_in(email, password).await {
            Ok(user) => {
                tracing::info!(email = %user.email, "Signed in");
                self.state.write().user = Some(user.clone());
                self.events.emit(SessionEvent::SignedIn(user.email.clone()));
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sign-in failed");
                Err(SessionError::SignInFailed(e.user_message()))
            }
        }
    }

    // endregion: --- Auth

    // region: --- Accessors

    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn history(&self) -> History {
        self.state.read().history.clone()
    }

    pub fn account(&self) -> Option<String> {
        self.state.read().account.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.read().is_connected()
    }

    pub fn error(&self) -> Option<SessionError> {
        self.state.read().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().is_loading
    }

    pub fn transaction_count(&self) -> Option<u64> {
        self.state.read().transaction_count
    }

    // endregion: --- Accessors
}

impl Drop for SessionContext {
    fn drop(&mut self) {
        self.generation.advance();
    }
}
