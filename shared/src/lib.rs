//! # Shared Data Model
//!
//! Types shared by every crate in the workspace: the wallet-side view of the
//! transaction ledger, the transfer draft, market snapshots and explorer entries.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data model
//!   - **[`dto::transaction`]**: `TransactionRecord`, `FormData`, `History`, `DataSource`
//!   - **[`dto::market`]**: `MarketCoin`, `EthQuote`, `Currency`
//!   - **[`dto::explorer`]**: `ExplorerTx`, `TxStatus`
//!   - **[`dto::units`]**: `Ether`, an exact base-unit amount
//! - **[`utils`]**: Display helpers
//!   - **[`utils::shorten_address`]**: `0x1234…abcd` form of a hex address
//!
//! ## Wire Format
//!
//! All DTOs serialize with `serde` defaults (snake_case fields). Optional fields
//! are omitted when `None`. Amounts serialize as the underlying base-unit integer.
//!
//! ```rust
//! use shared::{shorten_address, Ether};
//!
//! let amount = Ether::parse("0.75").unwrap();
//! assert_eq!(amount.to_string(), "0.75");
//! assert_eq!(shorten_address("0x742d35Cc6634C0532925a3b8D4C9db96590c6C87"), "0x742d…6C87");
//! ```

pub mod dto;
pub mod utils;

// DTO crate: everything exported is public API
pub use dto::*;
pub use utils::*;
