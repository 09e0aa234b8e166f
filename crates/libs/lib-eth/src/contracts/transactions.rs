//! # Transactions Contract
//!
//! [`TransactionsContract`] is the ledger as seen by the companion. The
//! [`RpcTransactionsContract`] implementation reads with `eth_call`, writes with
//! `eth_sendTransaction` through the provider endpoint (the connected signer) and
//! awaits confirmation by polling `eth_getTransactionReceipt`.

use super::abi::{addToBlockchainCall, getAllTransactionsCall, getTransactionCountCall, RawTransfer};
use crate::provider::ProviderError;
use crate::rpc::JsonRpcClient;
use crate::types::{PendingTransaction, Receipt, TransactionRequest};
use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde_json::json;
use shared::{Ether, TransactionRecord};
use std::time::{Duration, Instant};

/// The deployed ledger of transfers.
#[async_trait]
pub trait TransactionsContract: Send + Sync {
    fn address(&self) -> Address;

    /// Bind subsequent reads to `account`. Bindings without a signer notion ignore it.
    fn bind_signer(&self, _account: Option<Address>) {}

    /// Every recorded transfer, in ledger order.
    async fn get_all_transactions(&self) -> Result<Vec<RawTransfer>, ProviderError>;

    /// Number of recorded transfers.
    async fn get_transaction_count(&self) -> Result<u64, ProviderError>;

    /// Record transfer metadata. Returns once broadcast; await with
    /// [`TransactionsContract::wait_for_confirmation`].
    async fn add_to_blockchain(
        &self,
        from: Address,
        receiver: Address,
        amount: U256,
        message: &str,
        keyword: &str,
    ) -> Result<PendingTransaction, ProviderError>;

    /// Suspend until `pending` is mined. A reverted receipt is a call exception.
    async fn wait_for_confirmation(&self, pending: &PendingTransaction) -> Result<Receipt, ProviderError>;
}

/// Map a raw ledger entry to its display record: amount stays exact in base
/// units, the timestamp becomes a local display string.
pub fn decode_transfer(raw: &RawTransfer) -> TransactionRecord {
    let secs = u64::try_from(raw.timestamp)
        .ok()
        .and_then(|s| i64::try_from(s).ok())
        .unwrap_or(i64::MAX);

    TransactionRecord {
        address_from: raw.sender.to_string(),
        address_to: raw.receiver.to_string(),
        amount: Ether::from_wei(raw.amount),
        keyword: raw.keyword.clone(),
        message: raw.message.clone(),
        timestamp: lib_utils::format_local_timestamp(secs),
    }
}

/// Decode a whole ledger, preserving order.
pub fn decode_transfers(raw: &[RawTransfer]) -> Vec<TransactionRecord> {
    raw.iter().map(decode_transfer).collect()
}

/// JSON-RPC binding of the transactions contract.
pub struct RpcTransactionsContract {
    client: JsonRpcClient,
    address: Address,
    /// Account used as `from` for reads, mirroring a signer-bound contract.
    signer: parking_lot::RwLock<Option<Address>>,
    confirmation_poll: Duration,
    confirmation_timeout: Duration,
}

impl RpcTransactionsContract {
    pub fn new(
        rpc_url: &str,
        address: Address,
        timeout: Duration,
        confirmation_poll: Duration,
        confirmation_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: JsonRpcClient::new(rpc_url, timeout)?,
            address,
            signer: parking_lot::RwLock::new(None),
            confirmation_poll,
            confirmation_timeout,
        })
    }

    async fn call(&self, data: Vec<u8>) -> Result<Bytes, ProviderError> {
        let mut call = json!({
            "to": self.address,
            "data": Bytes::from(data),
        });
        if let Some(from) = *self.signer.read() {
            call["from"] = json!(from);
        }

        let output: Bytes = self.client.request("eth_call", json!([call, "latest"])).await?;

        // Calling an address without code succeeds with empty output.
        if output.is_empty() {
            return Err(ProviderError::CallException(format!(
                "no contract code at {}",
                self.address
            )));
        }
        Ok(output)
    }
}

#[async_trait]
impl TransactionsContract for RpcTransactionsContract {
    fn address(&self) -> Address {
        self.address
    }

    fn bind_signer(&self, account: Option<Address>) {
        *self.signer.write() = account;
    }

    async fn get_all_transactions(&self) -> Result<Vec<RawTransfer>, ProviderError> {
        let output = self.call(getAllTransactionsCall {}.abi_encode()).await?;
        getAllTransactionsCall::abi_decode_returns(&output)
            .map_err(|e| ProviderError::Decode(format!("getAllTransactions: {}", e)))
    }

    async fn get_transaction_count(&self) -> Result<u64, ProviderError> {
        let output = self.call(getTransactionCountCall {}.abi_encode()).await?;
        let count: U256 = getTransactionCountCall::abi_decode_returns(&output)
            .map_err(|e| ProviderError::Decode(format!("getTransactionCount: {}", e)))?;
        u64::try_from(count).map_err(|_| ProviderError::Decode(format!("transaction count overflow: {count}")))
    }

    async fn add_to_blockchain(
        &self,
        from: Address,
        receiver: Address,
        amount: U256,
        message: &str,
        keyword: &str,
    ) -> Result<PendingTransaction, ProviderError> {
        let data = addToBlockchainCall {
            receiver,
            amount,
            message: message.to_string(),
            keyword: keyword.to_string(),
        }
        .abi_encode();

        let tx = TransactionRequest::call(from, self.address, Bytes::from(data));
        let hash: B256 = self.client.request("eth_sendTransaction", json!([tx])).await?;
        tracing::info!(tx_hash = %hash, "Ledger record broadcast");

        Ok(PendingTransaction { hash })
    }

    async fn wait_for_confirmation(&self, pending: &PendingTransaction) -> Result<Receipt, ProviderError> {
        let started = Instant::now();
        loop {
            let receipt: Option<Receipt> = self
                .client
                .request("eth_getTransactionReceipt", json!([pending.hash]))
                .await?;

            if let Some(receipt) = receipt {
                if !receipt.succeeded() {
                    return Err(ProviderError::CallException(format!(
                        "transaction {} reverted",
                        pending.hash
                    )));
                }
                tracing::info!(tx_hash = %pending.hash, block = ?receipt.block_number, "Ledger record confirmed");
                return Ok(receipt);
            }

            if started.elapsed() >= self.confirmation_timeout {
                return Err(ProviderError::ConfirmationTimeout(pending.hash));
            }
            tokio::time::sleep(self.confirmation_poll).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::test_server;
    use alloy_sol_types::SolValue;
    use axum::{extract::State, routing::post, Json, Router};
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn transfer(amount_wei: u128, keyword: &str) -> RawTransfer {
        RawTransfer {
            sender: Address::repeat_byte(0xaa),
            receiver: Address::repeat_byte(0xbb),
            amount: U256::from(amount_wei),
            message: format!("{keyword} message"),
            timestamp: U256::from(1_700_000_000u64),
            keyword: keyword.to_string(),
        }
    }

    #[test]
    fn test_decode_transfer_is_exact() {
        let record = decode_transfer(&transfer(2_800_000_000_000_000_000, "defi"));
        assert_eq!(record.amount.to_string(), "2.8");
        assert_eq!(record.keyword, "defi");
        assert_eq!(record.address_from, Address::repeat_byte(0xaa).to_string());
        assert_eq!(record.timestamp, lib_utils::format_local_timestamp(1_700_000_000));
    }

    #[test]
    fn test_decode_preserves_ledger_order() {
        let raw = vec![transfer(1, "b"), transfer(2, "a")];
        let keywords: Vec<_> = decode_transfers(&raw).into_iter().map(|r| r.keyword).collect();
        assert_eq!(keywords, vec!["b", "a"]);
    }

    #[derive(Clone)]
    struct Node {
        ledger: Vec<RawTransfer>,
        deployed: bool,
        receipt_polls: Arc<AtomicUsize>,
    }

    async fn node(State(node): State<Node>, Json(req): Json<Value>) -> Json<Value> {
        let id = req["id"].clone();
        let result = match req["method"].as_str() {
            Some("eth_call") if !node.deployed => json!("0x"),
            Some("eth_call") => {
                let data = req["params"][0]["data"].as_str().unwrap_or_default().to_string();
                let selector = &data[2..10];
                if selector == alloy_primitives::hex::encode(getAllTransactionsCall::SELECTOR) {
                    let encoded = (node.ledger.clone(),).abi_encode_params();
                    json!(Bytes::from(encoded))
                } else {
                    json!(Bytes::from(U256::from(node.ledger.len()).abi_encode()))
                }
            }
            Some("eth_sendTransaction") => json!(B256::repeat_byte(0x42)),
            Some("eth_getTransactionReceipt") => {
                // Pending on the first poll, mined on the second.
                if node.receipt_polls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Value::Null
                } else {
                    json!({
                        "transactionHash": B256::repeat_byte(0x42),
                        "blockNumber": "0x1",
                        "status": "0x1"
                    })
                }
            }
            _ => Value::Null,
        };
        Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
    }

    async fn contract(node_state: Node) -> RpcTransactionsContract {
        let router = Router::new().route("/", post(node)).with_state(node_state);
        let url = test_server::spawn(router).await;
        RpcTransactionsContract::new(
            &url,
            Address::repeat_byte(0xcc),
            Duration::from_secs(5),
            Duration::from_millis(10),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_reads_ledger_and_count() {
        let ledger = vec![transfer(500_000_000_000_000_000, "payment"), transfer(1, "nft")];
        let contract = contract(Node {
            ledger: ledger.clone(),
            deployed: true,
            receipt_polls: Arc::default(),
        })
        .await;

        assert_eq!(contract.get_all_transactions().await.unwrap(), ledger);
        assert_eq!(contract.get_transaction_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_empty_output_is_call_exception() {
        let contract = contract(Node {
            ledger: Vec::new(),
            deployed: false,
            receipt_polls: Arc::default(),
        })
        .await;

        let err = contract.get_all_transactions().await.unwrap_err();
        assert!(err.is_call_exception(), "{err}");
    }

    #[tokio::test]
    async fn test_submit_and_wait_for_confirmation() {
        let polls = Arc::new(AtomicUsize::new(0));
        let contract = contract(Node {
            ledger: Vec::new(),
            deployed: true,
            receipt_polls: Arc::clone(&polls),
        })
        .await;

        let pending = contract
            .add_to_blockchain(
                Address::repeat_byte(0xaa),
                Address::repeat_byte(0xbb),
                U256::from(10u64),
                "hello",
                "gm",
            )
            .await
            .unwrap();
        assert_eq!(pending.hash, B256::repeat_byte(0x42));

        let receipt = contract.wait_for_confirmation(&pending).await.unwrap();
        assert!(receipt.succeeded());
        assert_eq!(polls.load(Ordering::SeqCst), 2);
    }
}
