//! # Sample Datasets
//!
//! Fixed data shown when live data cannot be read. Timestamps are anchored to the
//! first access so repeated loads within a process return identical sequences.

use alloy_primitives::U256;
use once_cell::sync::Lazy;
use shared::{Ether, ExplorerTx, TransactionRecord, TxStatus};

const DAY_SECS: i64 = 24 * 60 * 60;
const MILLI_ETHER: u64 = 1_000_000_000_000_000;

/// Address pairs as `(from, to)`.
const ADDRESS_PAIRS: [(&str, &str); 8] = [
    ("0x742d35Cc6634C0532925a3b8D4C9db96590c6C87", "0x8ba1f109551bD432803012645Hac136c22C177ec"),
    ("0x1234567890123456789012345678901234567890", "0x0987654321098765432109876543210987654321"),
    ("0xabcdefabcdefabcdefabcdefabcdefabcdefabcd", "0x1111222233334444555566667777888899990000"),
    ("0x9876543210987654321098765432109876543210", "0xfedcbafedcbafedcbafedcbafedcbafedcbafedcba"),
    ("0x5555666677778888999900001111222233334444", "0xaaaaaabbbbbbccccccddddddeeeeeeffffffffff"),
    ("0x1a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b", "0xf0e1d2c3b4a59687f0e1d2c3b4a59687f0e1d2c3"),
    ("0xabc123def456789abc123def456789abc123def4", "0x456789abc123def456789abc123def456789abc1"),
    ("0x789abc123def456789abc123def456789abc123d", "0x123def456789abc123def456789abc123def4567"),
];

/// Amounts in thousandths of an ether.
const AMOUNTS_MILLI: [u64; 8] = [500, 1200, 2800, 750, 3500, 1800, 900, 2200];

/// `(message, keyword)` of each ledger sample entry.
const LEDGER_NOTES: [(&str, &str); 6] = [
    ("Payment for services", "payment"),
    ("NFT purchase", "nft"),
    ("DeFi investment", "defi"),
    ("Token swap", "swap"),
    ("Staking rewards", "staking"),
    ("Liquidity provision", "liquidity"),
];

static ANCHOR: Lazy<i64> = Lazy::new(lib_utils::now_unix);

static LEDGER: Lazy<Vec<TransactionRecord>> = Lazy::new(|| {
    LEDGER_NOTES
        .iter()
        .enumerate()
        .map(|(i, (message, keyword))| {
            let (counterparty, sender) = ADDRESS_PAIRS[i];
            TransactionRecord {
                address_from: sender.to_string(),
                address_to: counterparty.to_string(),
                amount: milli_ether(AMOUNTS_MILLI[i]),
                keyword: (*keyword).to_string(),
                message: (*message).to_string(),
                timestamp: lib_utils::format_local_timestamp(days_ago(i as i64 + 1)),
            }
        })
        .collect()
});

static EXPLORER: Lazy<Vec<ExplorerTx>> = Lazy::new(|| {
    ADDRESS_PAIRS
        .iter()
        .zip(AMOUNTS_MILLI)
        .enumerate()
        .map(|(i, ((from, to), amount))| ExplorerTx {
            from: (*from).to_string(),
            to: (*to).to_string(),
            value: milli_ether(amount),
            timestamp: days_ago(i as i64 + 1),
            status: if i == ADDRESS_PAIRS.len() - 1 {
                TxStatus::Failed
            } else {
                TxStatus::Success
            },
        })
        .collect()
});

fn milli_ether(milli: u64) -> Ether {
    Ether::from_wei(U256::from(milli) * U256::from(MILLI_ETHER))
}

fn days_ago(days: i64) -> i64 {
    *ANCHOR - days * DAY_SECS
}

/// The six-entry ledger shown when the contract cannot be read.
pub fn sample_history() -> Vec<TransactionRecord> {
    LEDGER.clone()
}

/// The eight-entry explorer history shown when the explorer cannot be reached.
pub fn sample_explorer_history() -> Vec<ExplorerTx> {
    EXPLORER.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_history_shape() {
        let history = sample_history();
        assert_eq!(history.len(), 6);

        let amounts: Vec<_> = history.iter().map(|r| r.amount.to_string()).collect();
        assert_eq!(amounts, vec!["0.5", "1.2", "2.8", "0.75", "3.5", "1.8"]);
        assert_eq!(history[0].keyword, "payment");
        assert_eq!(history[5].message, "Liquidity provision");
        assert!(history.iter().all(|r| !r.timestamp.is_empty()));
    }

    #[test]
    fn test_sample_history_is_stable() {
        assert_eq!(sample_history(), sample_history());
    }

    #[test]
    fn test_sample_explorer_history() {
        let txs = sample_explorer_history();
        assert_eq!(txs.len(), 8);
        assert_eq!(txs.iter().filter(|t| t.status == TxStatus::Failed).count(), 1);
        assert_eq!(txs[7].status, TxStatus::Failed);
        assert!(txs.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    }
}
