//! # Ethereum Library
//!
//! External collaborators of the wallet companion, each behind a trait so the
//! orchestration layer can be driven by mocks:
//!
//! - [`provider`]: wallet provider (`WalletProvider`) and its error taxonomy
//! - [`rpc`]: JSON-RPC transport and the RPC-backed provider
//! - [`contracts`]: transactions contract ABI and binding (`TransactionsContract`)
//! - [`coingecko`]: market snapshot and ETH quote client
//! - [`etherscan`]: block-explorer account history client
//! - [`sample`]: fixed fallback datasets

// Declare all modules
pub mod coingecko;
pub mod contracts;
pub mod etherscan;
pub mod provider;
pub mod rpc;
pub mod sample;
pub mod types;

// Re-export commonly used types from root for convenience
pub use coingecko::CoinGeckoClient;
pub use contracts::{RpcTransactionsContract, TransactionsContract};
pub use etherscan::EtherscanClient;
pub use provider::{detect_provider, AbsentProvider, ProviderError, WalletProvider};
pub use rpc::{JsonRpcClient, RpcWalletProvider};
pub use types::{PendingTransaction, Receipt, TransactionRequest, TRANSFER_GAS_LIMIT};
