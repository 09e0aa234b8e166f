//! Hand-written collaborators for driving the session in tests.

use crate::core::{AuthService, AuthUser, ExplorerService, MarketService};
use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use lib_core::{AppError, Result};
use lib_eth::contracts::RawTransfer;
use lib_eth::{PendingTransaction, ProviderError, Receipt, TransactionRequest, TransactionsContract, WalletProvider};
use parking_lot::Mutex;
use shared::{EthQuote, ExplorerTx, MarketCoin};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const ACCOUNT: &str = "0x742d35cc6634c0532925a3b8d4c9db96590c6c87";
pub const RECIPIENT: &str = "0x0987654321098765432109876543210987654321";

// region: --- Wallet provider

pub struct MockProvider {
    accounts: Vec<String>,
    prompt_error: Option<ProviderError>,
    send_error: Option<ProviderError>,
    prompts: Arc<AtomicUsize>,
    sent: Arc<Mutex<Vec<TransactionRequest>>>,
}

impl MockProvider {
    pub fn with_accounts(accounts: &[&str]) -> Self {
        Self {
            accounts: accounts.iter().map(|a| a.to_string()).collect(),
            prompt_error: None,
            send_error: None,
            prompts: Arc::default(),
            sent: Arc::default(),
        }
    }

    pub fn connected() -> Self {
        Self::with_accounts(&[ACCOUNT])
    }

    pub fn failing_prompt(err: ProviderError) -> Self {
        Self {
            prompt_error: Some(err),
            ..Self::with_accounts(&[])
        }
    }

    pub fn failing_send(mut self, err: ProviderError) -> Self {
        self.send_error = Some(err);
        self
    }

    pub fn prompts(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.prompts)
    }

    pub fn sent(&self) -> Arc<Mutex<Vec<TransactionRequest>>> {
        Arc::clone(&self.sent)
    }
}

#[async_trait]
impl WalletProvider for MockProvider {
    fn is_present(&self) -> bool {
        true
    }

    async fn request_accounts(&self, prompting: bool) -> std::result::Result<Vec<String>, ProviderError> {
        if prompting {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = &self.prompt_error {
                return Err(err.clone());
            }
        }
        Ok(self.accounts.clone())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> std::result::Result<B256, ProviderError> {
        if let Some(err) = &self.send_error {
            return Err(err.clone());
        }
        self.sent.lock().push(tx);
        Ok(B256::repeat_byte(0x11))
    }
}

// endregion: --- Wallet provider

// region: --- Contract

pub struct MockContract {
    ledger: Mutex<Vec<RawTransfer>>,
    read_error: Mutex<Option<ProviderError>>,
    add_error: Option<ProviderError>,
    read_delay: Option<Duration>,
    confirm_delay: Option<Duration>,
    reads: AtomicUsize,
}

impl MockContract {
    pub fn with_ledger(ledger: Vec<RawTransfer>) -> Self {
        Self {
            ledger: Mutex::new(ledger),
            read_error: Mutex::new(None),
            add_error: None,
            read_delay: None,
            confirm_delay: None,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn failing_reads(err: ProviderError) -> Self {
        let contract = Self::with_ledger(Vec::new());
        *contract.read_error.lock() = Some(err);
        contract
    }

    pub fn failing_add(mut self, err: ProviderError) -> Self {
        self.add_error = Some(err);
        self
    }

    pub fn slow_reads(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    pub fn slow_confirmation(mut self, delay: Duration) -> Self {
        self.confirm_delay = Some(delay);
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

pub fn transfer(amount_wei: u128, keyword: &str) -> RawTransfer {
    RawTransfer {
        sender: Address::repeat_byte(0xaa),
        receiver: Address::repeat_byte(0xbb),
        amount: U256::from(amount_wei),
        message: format!("{keyword} message"),
        timestamp: U256::from(1_700_000_000u64),
        keyword: keyword.to_string(),
    }
}

#[async_trait]
impl TransactionsContract for MockContract {
    fn address(&self) -> Address {
        Address::repeat_byte(0xcc)
    }

    async fn get_all_transactions(&self) -> std::result::Result<Vec<RawTransfer>, ProviderError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.read_error.lock().clone() {
            return Err(err);
        }
        Ok(self.ledger.lock().clone())
    }

    async fn get_transaction_count(&self) -> std::result::Result<u64, ProviderError> {
        if let Some(err) = self.read_error.lock().clone() {
            return Err(err);
        }
        Ok(self.ledger.lock().len() as u64)
    }

    async fn add_to_blockchain(
        &self,
        from: Address,
        receiver: Address,
        amount: U256,
        message: &str,
        keyword: &str,
    ) -> std::result::Result<PendingTransaction, ProviderError> {
        if let Some(err) = &self.add_error {
            return Err(err.clone());
        }
        self.ledger.lock().push(RawTransfer {
            sender: from,
            receiver,
            amount,
            message: message.to_string(),
            timestamp: U256::from(1_700_000_000u64),
            keyword: keyword.to_string(),
        });
        Ok(PendingTransaction {
            hash: B256::repeat_byte(0x22),
        })
    }

    async fn wait_for_confirmation(
        &self,
        pending: &PendingTransaction,
    ) -> std::result::Result<Receipt, ProviderError> {
        match self.confirm_delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }
        Ok(Receipt {
            transaction_hash: pending.hash,
            block_number: Some("0x1".into()),
            status: Some("0x1".into()),
        })
    }
}

// endregion: --- Contract

// region: --- HTTP services

pub fn coin(id: &str, price: f64) -> MarketCoin {
    MarketCoin {
        id: id.to_string(),
        name: id.to_string(),
        symbol: id.to_string(),
        icon_url: String::new(),
        current_price: Some(price),
        day_change_percent: Some(1.0),
        market_cap: None,
    }
}

/// Market source replaying scripted polls; `None` simulates a network error.
/// Once the script runs out every poll succeeds with one coin.
#[derive(Default)]
pub struct MockMarket {
    script: Mutex<VecDeque<Option<Vec<MarketCoin>>>>,
    quote: Mutex<Option<EthQuote>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockMarket {
    pub fn scripted(script: Vec<Option<Vec<MarketCoin>>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    pub fn with_quote(self, quote: EthQuote) -> Self {
        *self.quote.lock() = Some(quote);
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketService for MockMarket {
    async fn market_snapshot(&self) -> Result<Vec<MarketCoin>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.script.lock().pop_front() {
            Some(Some(coins)) => Ok(coins),
            Some(None) => Err(AppError::Rpc("simulated network error".into())),
            None => Ok(vec![coin("ethereum", 3000.0)]),
        }
    }

    async fn eth_quote(&self) -> Result<EthQuote> {
        (*self.quote.lock()).ok_or_else(|| AppError::Rpc("quote unavailable".into()))
    }
}

#[derive(Default)]
pub struct MockExplorer {
    result: Mutex<Option<std::result::Result<Vec<ExplorerTx>, String>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockExplorer {
    pub fn returning(txs: Vec<ExplorerTx>) -> Self {
        Self {
            result: Mutex::new(Some(Ok(txs))),
            ..Default::default()
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Mutex::new(Some(Err(reason.to_string()))),
            ..Default::default()
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExplorerService for MockExplorer {
    async fn account_transactions(&self, _address: &str, _page_size: u32) -> Result<Vec<ExplorerTx>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.result.lock().clone() {
            Some(Ok(txs)) => Ok(txs),
            Some(Err(reason)) => Err(AppError::Rpc(reason)),
            None => Ok(Vec::new()),
        }
    }
}

pub struct MockAuth;

pub const PASSWORD: &str = "hunter22";

#[async_trait]
impl AuthService for MockAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        if password != PASSWORD {
            return Err(AppError::InvalidInput("INVALID_PASSWORD".into()));
        }
        Ok(AuthUser {
            uid: "uid-1".into(),
            email: email.to_string(),
            id_token: "token".into(),
        })
    }
}

// endregion: --- HTTP services
