//! # Ledger Records and Transfer Drafts
//!
//! [`TransactionRecord`] is the display form of one ledger entry. [`History`] wraps a
//! sequence of records together with its provenance so that consumers never have to
//! guess whether they are looking at live or sample data.

use super::units::Ether;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One entry of the transaction ledger, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub address_from: String,
    pub address_to: String,
    /// Exact amount; `raw / 10^18` when decoded from the contract.
    pub amount: Ether,
    /// Short label attached to the transfer.
    pub keyword: String,
    pub message: String,
    /// Local display string.
    pub timestamp: String,
}

/// Where a piece of transaction data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Read from the ledger or explorer.
    Live,
    /// Fixed fallback dataset.
    Sample,
}

impl DataSource {
    pub fn is_sample(&self) -> bool {
        matches!(self, DataSource::Sample)
    }
}

/// Why sample data is being shown instead of live data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No wallet provider is configured; live data was never reachable.
    NoProvider,
    /// The contract call reverted or nothing is deployed at the configured address.
    ContractUnavailable,
    /// The provider or network failed transiently.
    Unreachable,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FallbackReason::NoProvider => "no wallet provider",
            FallbackReason::ContractUnavailable => "contract not deployed on this network",
            FallbackReason::Unreachable => "ledger temporarily unreachable",
        };
        f.write_str(text)
    }
}

/// A transaction list tagged with its provenance. Never empty of meaning:
/// either live records or the sample sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    pub records: Vec<TransactionRecord>,
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackReason>,
}

impl History {
    pub fn live(records: Vec<TransactionRecord>) -> Self {
        Self {
            records,
            source: DataSource::Live,
            fallback: None,
        }
    }

    pub fn sample(records: Vec<TransactionRecord>, reason: FallbackReason) -> Self {
        Self {
            records,
            source: DataSource::Sample,
            fallback: Some(reason),
        }
    }

    pub fn is_using_sample(&self) -> bool {
        self.source.is_sample()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Field of the transfer draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    AddressTo,
    Amount,
    Keyword,
    Message,
}

impl FormField {
    pub fn all() -> &'static [FormField] {
        &[
            FormField::AddressTo,
            FormField::Amount,
            FormField::Keyword,
            FormField::Message,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::AddressTo => "Address To",
            FormField::Amount => "Amount (ETH)",
            FormField::Keyword => "Keyword (Gif)",
            FormField::Message => "Enter Message",
        }
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "addressTo" | "address_to" => Ok(FormField::AddressTo),
            "amount" => Ok(FormField::Amount),
            "keyword" => Ok(FormField::Keyword),
            "message" => Ok(FormField::Message),
            other => Err(format!("Unknown form field: {other}")),
        }
    }
}

/// Mutable draft of a pending transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub address_to: String,
    pub amount: String,
    pub keyword: String,
    pub message: String,
}

impl FormData {
    pub fn new(
        address_to: impl Into<String>,
        amount: impl Into<String>,
        keyword: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            address_to: address_to.into(),
            amount: amount.into(),
            keyword: keyword.into(),
            message: message.into(),
        }
    }

    /// Replace exactly one field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::AddressTo => self.address_to = value,
            FormField::Amount => self.amount = value,
            FormField::Keyword => self.keyword = value,
            FormField::Message => self.message = value,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::AddressTo => &self.address_to,
            FormField::Amount => &self.amount,
            FormField::Keyword => &self.keyword,
            FormField::Message => &self.message,
        }
    }

    /// Fields that are still blank.
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::all()
            .iter()
            .copied()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
