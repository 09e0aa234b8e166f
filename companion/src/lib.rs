//! # Xcrypt Wallet Companion - Library Root
//!
//! The orchestration layer of a wallet companion: it connects to a wallet
//! provider, reads the on-chain transaction ledger (falling back to sample data),
//! submits transfers, polls market prices and previews explorer history.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │               companion (this crate)                     │
//! │   SessionContext ─┬─ WalletSessionManager                │
//! │                   ├─ LedgerReader / TransactionSubmitter │
//! │                   ├─ MarketPoller / EthConverter         │
//! │                   └─ ExplorerHistory                     │
//! └──────────────────────────────────────────────────────────┘
//!          │ JSON-RPC                      │ HTTP
//!          ▼                               ▼
//! ┌─────────────────────┐       ┌────────────────────────────┐
//! │ Wallet provider +   │       │ CoinGecko / Etherscan /    │
//! │ Transactions ledger │       │ Identity Toolkit           │
//! └─────────────────────┘       └────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **app**: session state, events and the [`app::SessionContext`]
//! - **core**: session error taxonomy and service traits
//! - **services**: wallet session, ledger reader, submitter, market poller,
//!   explorer history, converter and sign-in
//! - **debug**: tracing setup

pub mod app;
pub mod core;
pub mod debug;
pub mod services;

pub use app::{SessionContext, SessionEvent};
pub use core::SessionError;
