//! # Key/Value Store
//!
//! The only durable state the companion keeps is a handful of string keys, the
//! last known ledger size among them (`transactionCount`). [`FileStore`] persists
//! them as a small JSON object; [`MemoryStore`] backs tests and ephemeral sessions.

// region: --- Modules
mod file;
mod memory;
// endregion: --- Modules

// region: --- Re-exports
pub use file::FileStore;
pub use memory::MemoryStore;
// endregion: --- Re-exports

use crate::error::Result;

/// Key holding the last known number of ledger entries.
pub const TRANSACTION_COUNT_KEY: &str = "transactionCount";

/// String key/value storage with last-write-wins semantics.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Read the cached transaction count. Missing or unparsable values read as `None`.
pub fn load_transaction_count(store: &dyn KeyValueStore) -> Result<Option<u64>> {
    let value = store.get(TRANSACTION_COUNT_KEY)?;
    Ok(value.and_then(|v| v.trim().parse().ok()))
}

/// Persist the transaction count.
pub fn save_transaction_count(store: &dyn KeyValueStore, count: u64) -> Result<()> {
    store.set(TRANSACTION_COUNT_KEY, &count.to_string())
}
