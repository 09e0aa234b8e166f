//! # Data Model
//!
//! - [`transaction`] - ledger records, transfer draft and history provenance
//! - [`market`] - market snapshots and the ETH quote
//! - [`explorer`] - block-explorer transaction entries
//! - [`units`] - exact native-currency amounts

pub mod explorer;
pub mod market;
pub mod transaction;
pub mod units;

pub use explorer::*;
pub use market::*;
pub use transaction::*;
pub use units::*;
