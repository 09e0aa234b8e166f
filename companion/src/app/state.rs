//! # Session State Types
//!
//! Everything the UI renders lives here. State is owned by the
//! [`SessionContext`](super::SessionContext) and mutated only through its operations.

use crate::core::{AuthUser, SessionError};
use chrono::{DateTime, Local};
use lib_eth::sample::sample_history;
use shared::{FallbackReason, FormData, History, MarketCoin};

/// Coins shown before the first "load more".
pub const MARKET_PAGE_SIZE: usize = 9;

/// Wallet session, ledger and transfer draft.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Whether a wallet provider was detected.
    pub provider_installed: bool,
    /// Connected account; `None` while disconnected.
    pub account: Option<String>,
    /// An account prompt is open.
    pub connecting: bool,
    /// Current error surface.
    pub error: Option<SessionError>,
    /// Ledger history with its provenance. Never absent.
    pub history: History,
    /// Last known ledger size, seeded from the durable store.
    pub transaction_count: Option<u64>,
    pub form: FormData,
    /// A ledger record is awaiting confirmation.
    pub is_loading: bool,
    /// Signed-in user, kept for the session only.
    pub user: Option<AuthUser>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            provider_installed: false,
            account: None,
            connecting: false,
            error: None,
            history: History::sample(sample_history(), FallbackReason::NoProvider),
            transaction_count: None,
            form: FormData::default(),
            is_loading: false,
            user: None,
        }
    }
}

impl SessionState {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }
}

/// Market poller lifecycle.
///
/// ```text
/// Idle ──▶ Loading ──▶ Ready ◀──▶ Refreshing
///             │
///             ▼
///           Error ──▶ Loading
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollStatus {
    #[default]
    Idle,
    /// First fetch, nothing to show yet.
    Loading,
    Ready,
    /// Re-fetch with the last good snapshot still displayed.
    Refreshing,
    /// The first fetch failed; no snapshot exists.
    Error,
}

impl PollStatus {
    pub fn is_fetching(&self) -> bool {
        matches!(self, PollStatus::Loading | PollStatus::Refreshing)
    }
}

#[derive(Debug, Clone)]
pub struct MarketState {
    pub status: PollStatus,
    pub coins: Vec<MarketCoin>,
    /// Set only in [`PollStatus::Error`].
    pub error: Option<SessionError>,
    pub display_count: usize,
    pub last_updated: Option<DateTime<Local>>,
}

impl Default for MarketState {
    fn default() -> Self {
        Self {
            status: PollStatus::Idle,
            coins: Vec::new(),
            error: None,
            display_count: MARKET_PAGE_SIZE,
            last_updated: None,
        }
    }
}

impl MarketState {
    /// Coins currently shown.
    pub fn visible(&self) -> &[MarketCoin] {
        let end = self.display_count.min(self.coins.len());
        &self.coins[..end]
    }

    /// Show the next page, capped at the snapshot length.
    pub fn load_more(&mut self) {
        self.display_count = (self.display_count + MARKET_PAGE_SIZE).min(self.coins.len().max(MARKET_PAGE_SIZE));
    }

    /// Coins not yet shown.
    pub fn remaining(&self) -> usize {
        self.coins.len().saturating_sub(self.display_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(i: usize) -> MarketCoin {
        MarketCoin {
            id: format!("coin-{i}"),
            name: format!("Coin {i}"),
            symbol: format!("c{i}"),
            icon_url: String::new(),
            current_price: Some(i as f64),
            day_change_percent: None,
            market_cap: None,
        }
    }

    #[test]
    fn test_market_paging() {
        let mut market = MarketState {
            coins: (0..20).map(coin).collect(),
            ..Default::default()
        };
        assert_eq!(market.visible().len(), 9);
        assert_eq!(market.remaining(), 11);

        market.load_more();
        assert_eq!(market.visible().len(), 18);

        market.load_more();
        assert_eq!(market.visible().len(), 20);
        assert_eq!(market.remaining(), 0);
    }

    #[test]
    fn test_default_session_has_sample_history() {
        let state = SessionState::default();
        assert!(state.history.is_using_sample());
        assert_eq!(state.history.len(), 6);
        assert!(!state.is_connected());
    }
}
