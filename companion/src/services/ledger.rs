//! # Transaction Ledger Reader
//!
//! Reads the ledger from the transactions contract and always produces a
//! [`History`]: live records when the read succeeds, the sample sequence
//! otherwise, tagged with why.
//!
//! | Condition | Result | Error surface |
//! |-----------|--------|---------------|
//! | no provider | sample (`NoProvider`) | untouched |
//! | no contract configured, revert, no code | sample (`ContractUnavailable`) | cleared |
//! | any other failure | sample (`Unreachable`) | untouched, logged |

use crate::app::events::{EventSink, SessionEvent};
use crate::app::generation::Generation;
use crate::app::state::SessionState;
use crate::core::SessionError;
use alloy_primitives::Address;
use lib_core::model::store::{load_transaction_count, save_transaction_count};
use lib_core::KeyValueStore;
use lib_eth::contracts::decode_transfers;
use lib_eth::sample::sample_history;
use lib_eth::{TransactionsContract, WalletProvider};
use parking_lot::RwLock;
use shared::{FallbackReason, History};
use std::sync::Arc;

pub struct LedgerReader {
    provider: Arc<dyn WalletProvider>,
    contract: Option<Arc<dyn TransactionsContract>>,
    store: Arc<dyn KeyValueStore>,
    state: Arc<RwLock<SessionState>>,
    events: EventSink,
    generation: Generation,
}

impl LedgerReader {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        contract: Option<Arc<dyn TransactionsContract>>,
        store: Arc<dyn KeyValueStore>,
        state: Arc<RwLock<SessionState>>,
        events: EventSink,
        generation: Generation,
    ) -> Self {
        Self {
            provider,
            contract,
            store,
            state,
            events,
            generation,
        }
    }

    /// Read the whole ledger once. Never fails: every failure path yields the
    /// sample sequence.
    pub async fn load_history(&self) -> History {
        let token = self.generation.current();
        let (history, clear_error) = self.read_history().await;

        if !self.generation.is_current(token) {
            tracing::debug!("Discarding ledger read from a previous session");
            return history;
        }

        let error_cleared = {
            let mut state = self.state.write();
            state.history = history.clone();
            clear_error && state.error.take().is_some()
        };
        if error_cleared {
            self.events.emit(SessionEvent::ErrorCleared);
        }
        self.events.emit(SessionEvent::HistoryLoaded(history.clone()));
        history
    }

    async fn read_history(&self) -> (History, bool) {
        if !self.provider.is_present() {
            tracing::info!("No wallet provider - showing sample history");
            return (History::sample(sample_history(), FallbackReason::NoProvider), false);
        }

        let Some(contract) = self.contract.as_ref() else {
            tracing::info!("No transactions contract configured - showing sample history");
            return (History::sample(sample_history(), FallbackReason::ContractUnavailable), true);
        };

        contract.bind_signer(self.signer());
        match contract.get_all_transactions().await {
            Ok(raw) => {
                let records = decode_transfers(&raw);
                tracing::info!(record_count = records.len(), "Ledger history loaded");
                (History::live(records), false)
            }
            Err(e) if e.is_call_exception() => {
                tracing::info!(error = %e, contract = %contract.address(), "Contract unavailable - showing sample history");
                (History::sample(sample_history(), FallbackReason::ContractUnavailable), true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ledger read failed - showing sample history");
                (History::sample(sample_history(), FallbackReason::Unreachable), false)
            }
        }
    }

    /// Seed the in-memory count from the durable store.
    pub fn restore_transaction_count(&self) -> Option<u64> {
        let count = match load_transaction_count(self.store.as_ref()) {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cached transaction count");
                None
            }
        };
        self.state.write().transaction_count = count;
        count
    }

    /// Refresh the ledger size from the contract and persist it.
    ///
    /// No provider or no contract is a no-op. A missing contract is logged only;
    /// other failures raise `CountCheckFailed`.
    pub async fn check_transaction_count(&self) -> Result<Option<u64>, SessionError> {
        if !self.provider.is_present() {
            return Ok(None);
        }
        let Some(contract) = self.contract.as_ref() else {
            return Ok(None);
        };

        let token = self.generation.current();
        let result = contract.get_transaction_count().await;
        if !self.generation.is_current(token) {
            return Ok(None);
        }

        match result {
            Ok(count) => {
                self.record_count(count);
                Ok(Some(count))
            }
            Err(e) if e.is_call_exception() => {
                tracing::info!(error = %e, "Transaction count unavailable - contract not deployed");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Transaction count check failed");
                self.state.write().error = Some(SessionError::CountCheckFailed);
                self.events.emit(SessionEvent::ErrorRaised(SessionError::CountCheckFailed));
                Err(SessionError::CountCheckFailed)
            }
        }
    }

    /// Update the cached count in memory and on disk.
    pub(crate) fn record_count(&self, count: u64) {
        if let Err(e) = save_transaction_count(self.store.as_ref(), count) {
            tracing::warn!(error = %e, "Failed to persist transaction count");
        }
        self.state.write().transaction_count = Some(count);
        self.events.emit(SessionEvent::TransactionCountUpdated(count));
    }

    fn signer(&self) -> Option<Address> {
        self.state.read().account.as_deref().and_then(|a| a.parse().ok())
    }
}
