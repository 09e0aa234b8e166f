//! # Service Traits
//!
//! Traits for dependency injection, so the session can be driven by mocks in tests.

use async_trait::async_trait;
use lib_core::Result;
use lib_eth::{CoinGeckoClient, EtherscanClient};
use serde::{Deserialize, Serialize};
use shared::{EthQuote, ExplorerTx, MarketCoin};

/// Rows requested per market snapshot.
pub const MARKET_SNAPSHOT_SIZE: u32 = lib_eth::coingecko::DEFAULT_PER_PAGE;

/// Market data source for the poller and the converter.
#[async_trait]
pub trait MarketService: Send + Sync {
    /// Ordered market snapshot, replaced wholesale on each poll.
    async fn market_snapshot(&self) -> Result<Vec<MarketCoin>>;

    /// ETH spot price in the converter's currencies.
    async fn eth_quote(&self) -> Result<EthQuote>;
}

/// Block-explorer account history.
#[async_trait]
pub trait ExplorerService: Send + Sync {
    async fn account_transactions(&self, address: &str, page_size: u32) -> Result<Vec<ExplorerTx>>;
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    pub email: String,
    pub id_token: String,
}

/// Email/password authentication provider.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;
}

#[async_trait]
impl MarketService for CoinGeckoClient {
    async fn market_snapshot(&self) -> Result<Vec<MarketCoin>> {
        self.get_markets("usd", MARKET_SNAPSHOT_SIZE).await
    }

    async fn eth_quote(&self) -> Result<EthQuote> {
        self.get_eth_quote().await
    }
}

#[async_trait]
impl ExplorerService for EtherscanClient {
    async fn account_transactions(&self, address: &str, page_size: u32) -> Result<Vec<ExplorerTx>> {
        EtherscanClient::account_transactions(self, address, page_size).await
    }
}
