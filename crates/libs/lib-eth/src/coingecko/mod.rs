//! # CoinGecko
//!
//! Public market data: the ranked `coins/markets` snapshot and the ETH spot
//! quote used by the converter.

mod client;
mod types;

pub use client::{CoinGeckoClient, DEFAULT_PER_PAGE};
