//! # ETH Price Converter
//!
//! Converts an ETH amount typed by the user into USD or INR using the latest
//! spot quote.

use crate::core::MarketService;
use parking_lot::RwLock;
use shared::{Currency, EthQuote};
use std::sync::Arc;

pub struct EthConverter {
    service: Arc<dyn MarketService>,
    quote: RwLock<Option<EthQuote>>,
    amount: RwLock<f64>,
}

impl EthConverter {
    pub fn new(service: Arc<dyn MarketService>) -> Self {
        Self {
            service,
            quote: RwLock::new(None),
            amount: RwLock::new(1.0),
        }
    }

    /// Fetch a fresh quote. A failure keeps the previous one.
    pub async fn refresh_quote(&self) -> Option<EthQuote> {
        match self.service.eth_quote().await {
            Ok(quote) => {
                tracing::debug!(usd = quote.usd, inr = quote.inr, "ETH quote updated");
                *self.quote.write() = Some(quote);
            }
            Err(e) => tracing::warn!(error = %e, "ETH quote fetch failed"),
        }
        self.quote()
    }

    pub fn quote(&self) -> Option<EthQuote> {
        *self.quote.read()
    }

    /// Set the amount from user input. Unparsable or negative input counts as zero.
    pub fn set_amount(&self, input: &str) -> f64 {
        let amount = parse_amount(input);
        *self.amount.write() = amount;
        amount
    }

    pub fn amount(&self) -> f64 {
        *self.amount.read()
    }

    /// Converted value with two decimals, `None` until a quote exists.
    pub fn convert(&self, currency: Currency) -> Option<String> {
        self.quote()
            .map(|quote| format!("{:.2}", self.amount() * quote.price(currency)))
    }
}

fn parse_amount(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}
