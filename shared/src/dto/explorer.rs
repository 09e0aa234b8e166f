//! # Explorer Entries
//!
//! Account transactions as listed by a block explorer, used for the
//! "recent transactions" preview.

use super::units::Ether;
use serde::{Deserialize, Serialize};

/// Execution outcome reported by the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failed,
}

impl TxStatus {
    /// Explorer `isError` flag: `"0"` means success.
    pub fn from_is_error(flag: &str) -> Self {
        if flag.trim() == "0" {
            TxStatus::Success
        } else {
            TxStatus::Failed
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TxStatus::Success => "✓ Success",
            TxStatus::Failed => "✗ Failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerTx {
    pub from: String,
    pub to: String,
    pub value: Ether,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub status: TxStatus,
}
