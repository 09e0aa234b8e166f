use super::types::SimplePriceResponse;
use lib_core::{AppError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{EthQuote, MarketCoin};
use std::time::Duration;

/// Rows requested per snapshot.
pub const DEFAULT_PER_PAGE: u32 = 50;

/// HTTP client for the CoinGecko v3 API.
#[derive(Clone)]
pub struct CoinGeckoClient {
    http: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Top coins by market cap, in the provider's order.
    #[tracing::instrument(skip(self))]
    pub async fn get_markets(&self, vs_currency: &str, per_page: u32) -> Result<Vec<MarketCoin>> {
        let url = format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=false",
            self.base_url, vs_currency, per_page
        );
        let coins: Vec<MarketCoin> = self.get_json(&url, "market snapshot").await?;
        tracing::debug!(coin_count = coins.len(), "Market snapshot fetched");
        Ok(coins)
    }

    /// ETH spot price in USD and INR.
    #[tracing::instrument(skip(self))]
    pub async fn get_eth_quote(&self) -> Result<EthQuote> {
        let url = format!("{}/simple/price?ids=ethereum&vs_currencies=usd,inr", self.base_url);
        let response: SimplePriceResponse = self.get_json(&url, "ETH quote").await?;

        let price = response
            .ethereum
            .ok_or_else(|| AppError::Decoding("ETH quote missing `ethereum`".to_string()))?;
        match (price.usd, price.inr) {
            (Some(usd), Some(inr)) => Ok(EthQuote { usd, inr }),
            _ => Err(AppError::Decoding("ETH quote missing a currency".to_string())),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let start = std::time::Instant::now();

        let response = self.http.get(url).send().await.map_err(|e| {
            tracing::error!(error = %e, "{} network error", what);
            AppError::Rpc(format!("Network error: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                duration_ms = start.elapsed().as_millis(),
                "{} fetch failed",
                what
            );
            return Err(AppError::Rpc(format!("Failed to fetch {}: {}", what, status)));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!(error = %e, "{} parse error", what);
            AppError::Decoding(format!("Failed to parse {}: {}", what, e))
        })
    }
}
