//! # Transaction Types
//!
//! Request and receipt shapes exchanged with the wallet provider (EIP-1193 / JSON-RPC).

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Gas limit hint for a plain native-currency transfer (`0x5208`).
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Parameters of `eth_sendTransaction`. Quantities serialize as `0x`-hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Bytes>,
}

impl TransactionRequest {
    /// Native transfer of `value` base units with the fixed gas hint.
    pub fn transfer(from: Address, to: Address, value: U256) -> Self {
        Self {
            from,
            to,
            value: Some(value),
            gas: Some(U256::from(TRANSFER_GAS_LIMIT)),
            data: None,
        }
    }

    /// Contract call carrying `data`; gas is left to the provider's estimate.
    pub fn call(from: Address, to: Address, data: Bytes) -> Self {
        Self {
            from,
            to,
            value: None,
            gas: None,
            data: Some(data),
        }
    }
}

/// A broadcast transaction whose confirmation can be awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingTransaction {
    pub hash: B256,
}

/// Subset of `eth_getTransactionReceipt` used to decide success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<String>,
    /// `0x1` success, `0x0` reverted. Absent on pre-Byzantium chains.
    #[serde(default)]
    pub status: Option<String>,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        self.status
            .as_deref()
            .map(|s| s != "0x0" && s != "0x00")
            .unwrap_or(true)
    }
}
