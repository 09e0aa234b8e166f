//! # Market Data
//!
//! Snapshot rows as returned by the CoinGecko `coins/markets` endpoint, and the
//! ETH quote used by the price converter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of a market snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketCoin {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(rename = "image", default)]
    pub icon_url: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(rename = "price_change_percentage_24h", default)]
    pub day_change_percent: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

impl MarketCoin {
    /// Gainers and flat coins render as up.
    pub fn is_up(&self) -> bool {
        self.day_change_percent.map(|c| c >= 0.0).unwrap_or(true)
    }
}

/// Fiat currencies offered by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Inr,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Inr => "₹",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Usd => f.write_str("USD"),
            Currency::Inr => f.write_str("INR"),
        }
    }
}

/// Spot price of one ETH.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EthQuote {
    pub usd: f64,
    pub inr: f64,
}

impl EthQuote {
    pub fn price(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Usd => self.usd,
            Currency::Inr => self.inr,
        }
    }
}
