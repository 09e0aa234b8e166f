//! # Services
//!
//! The session's working parts. Each owns one concern and writes to the shared
//! session state only through its own operations.
//!
//! - [`wallet_session`]: provider detection and account connection
//! - [`ledger`]: ledger history with sample fallback, cached transaction count
//! - [`submitter`]: transfer broadcast and ledger record
//! - [`market_poller`]: periodic market snapshot
//! - [`explorer`]: block-explorer preview
//! - [`converter`]: ETH to fiat conversion
//! - [`auth`]: email/password sign-in

pub mod auth;
pub mod converter;
pub mod explorer;
pub mod ledger;
pub mod market_poller;
pub mod submitter;
pub mod wallet_session;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::IdentityToolkitClient;
pub use converter::EthConverter;
pub use explorer::{ExplorerHistory, ExplorerState};
pub use ledger::LedgerReader;
pub use market_poller::MarketPoller;
pub use submitter::{Submission, TransactionSubmitter, Transfer};
pub use wallet_session::WalletSessionManager;
