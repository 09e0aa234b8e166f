//! # Contract Bindings
//!
//! The on-chain transactions ledger: its ABI ([`abi`]), the binding trait the
//! companion consumes ([`TransactionsContract`]) and its JSON-RPC implementation.

// region: --- Modules
pub mod abi;
pub mod transactions;
// endregion: --- Modules

pub use abi::RawTransfer;
pub use transactions::{decode_transfer, decode_transfers, RpcTransactionsContract, TransactionsContract};
