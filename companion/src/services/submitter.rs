//! # Transaction Submitter
//!
//! Broadcasts a native transfer through the wallet provider, records its metadata
//! on the ledger and waits for confirmation. Single-flight: a second submission
//! while one is running is refused.
//!
//! The loading flag is raised for the confirmation wait and lowered on every exit
//! path. Resynchronising the ledger and draft afterwards is up to the caller.

use crate::app::events::{EventSink, SessionEvent};
use crate::app::generation::Generation;
use crate::app::state::SessionState;
use crate::core::SessionError;
use crate::services::ledger::LedgerReader;
use alloy_primitives::Address;
use lib_eth::{TransactionRequest, TransactionsContract, WalletProvider};
use parking_lot::RwLock;
use shared::Ether;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A validated transfer ready to broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub amount: Ether,
    pub keyword: String,
    pub message: String,
}

/// Outcome of a confirmed submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub transfer_hash: alloy_primitives::B256,
    pub record_hash: alloy_primitives::B256,
    pub transaction_count: Option<u64>,
}

pub struct TransactionSubmitter {
    provider: Arc<dyn WalletProvider>,
    contract: Option<Arc<dyn TransactionsContract>>,
    ledger: Arc<LedgerReader>,
    state: Arc<RwLock<SessionState>>,
    events: EventSink,
    generation: Generation,
    in_flight: AtomicBool,
}

/// Lowers the loading flag when the confirmation wait ends, however it ends.
struct LoadingGuard<'a> {
    state: &'a RwLock<SessionState>,
    events: &'a EventSink,
}

impl<'a> LoadingGuard<'a> {
    fn raise(state: &'a RwLock<SessionState>, events: &'a EventSink) -> Self {
        state.write().is_loading = true;
        events.emit(SessionEvent::LoadingChanged(true));
        Self { state, events }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.write().is_loading = false;
        self.events.emit(SessionEvent::LoadingChanged(false));
    }
}

/// Holds the single-flight slot. Released on drop, so a submission whose
/// future is cancelled mid-await does not block later ones.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl TransactionSubmitter {
    pub fn new(
        provider: Arc<dyn WalletProvider>,
        contract: Option<Arc<dyn TransactionsContract>>,
        ledger: Arc<LedgerReader>,
        state: Arc<RwLock<SessionState>>,
        events: EventSink,
        generation: Generation,
    ) -> Self {
        Self {
            provider,
            contract,
            ledger,
            state,
            events,
            generation,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Send `transfer` and record it on the ledger.
    ///
    /// Any failing step aborts the whole submission; nothing is retried.
    #[tracing::instrument(skip(self, transfer), fields(to = %transfer.to, amount = %transfer.amount))]
    pub async fn submit(&self, transfer: Transfer) -> Result<Submission, SessionError> {
        if !self.provider.is_present() {
            return Err(SessionError::ProviderAbsent);
        }
        let contract = self
            .contract
            .clone()
            .ok_or(SessionError::ContractUnavailable)?;

        let Some(_slot) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("Submission already in flight - ignoring");
            return Err(SessionError::SubmissionInFlight);
        };

        let result = self.run(contract.as_ref(), &transfer).await;

        if let Err(e) = &result {
            tracing::error!(error = %e, "Transaction submission failed");
        }
        result
    }

    async fn run(&self, contract: &dyn TransactionsContract, transfer: &Transfer) -> Result<Submission, SessionError> {
        let token = self.generation.current();

        let request = TransactionRequest::transfer(transfer.from, transfer.to, transfer.amount.wei());
        let transfer_hash = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| SessionError::from_submission(&e))?;
        tracing::info!(tx_hash = %transfer_hash, "Transfer broadcast");

        let pending = contract
            .add_to_blockchain(
                transfer.from,
                transfer.to,
                transfer.amount.wei(),
                &transfer.message,
                &transfer.keyword,
            )
            .await
            .map_err(|e| SessionError::from_submission(&e))?;

        let receipt = {
            let _loading = LoadingGuard::raise(&self.state, &self.events);
            contract
                .wait_for_confirmation(&pending)
                .await
                .map_err(|e| SessionError::from_submission(&e))?
        };
        tracing::info!(tx_hash = %receipt.transaction_hash, "Ledger record confirmed");

        let transaction_count = match contract.get_transaction_count().await {
            Ok(count) if self.generation.is_current(token) => {
                self.ledger.record_count(count);
                Some(count)
            }
            Ok(_) => None,
            Err(e) => return Err(SessionError::from_submission(&e)),
        };

        Ok(Submission {
            transfer_hash,
            record_hash: pending.hash,
            transaction_count,
        })
    }
}
