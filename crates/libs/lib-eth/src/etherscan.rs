//! # Etherscan
//!
//! Account history from the Etherscan v1 `account/txlist` endpoint, newest first.
//!
//! The explorer answers HTTP 200 for almost everything and reports failure in the
//! envelope: `status == "0"` with a string `result` is an error, while
//! `"No transactions found"` is just an empty history.

use lib_core::{AppError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use shared::{Ether, ExplorerTx, TxStatus};
use std::time::Duration;

const NO_TRANSACTIONS: &str = "No transactions found";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTx {
    from: String,
    #[serde(default)]
    to: String,
    value: String,
    time_stamp: String,
    #[serde(default)]
    is_error: String,
}

impl RawTx {
    fn into_explorer_tx(self) -> Result<ExplorerTx> {
        let value = Ether::from_wei_str(&self.value)
            .ok_or_else(|| AppError::Decoding(format!("Invalid value: {}", self.value)))?;
        let timestamp = self
            .time_stamp
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Decoding(format!("Invalid timeStamp: {}", self.time_stamp)))?;

        Ok(ExplorerTx {
            from: self.from,
            to: self.to,
            value,
            timestamp,
            status: TxStatus::from_is_error(&self.is_error),
        })
    }
}

#[derive(Clone)]
pub struct EtherscanClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl EtherscanClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }

    /// Most recent transactions of `address`, at most `page_size`.
    #[tracing::instrument(skip(self), fields(address = %address))]
    pub async fn account_transactions(&self, address: &str, page_size: u32) -> Result<Vec<ExplorerTx>> {
        let page_size = page_size.to_string();
        let mut query = vec![
            ("module", "account"),
            ("action", "txlist"),
            ("address", address),
            ("startblock", "1"),
            ("offset", page_size.as_str()),
            ("page", "1"),
            ("sort", "desc"),
        ];
        if let Some(key) = self.api_key.as_deref() {
            query.push(("apikey", key));
        }

        let response = self
            .http
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Explorer network error");
                AppError::Rpc(format!("Network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Explorer request failed");
            return Err(AppError::Rpc(format!("Explorer returned {}", status)));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| AppError::Decoding(format!("Failed to parse explorer response: {}", e)))?;

        match envelope.result {
            Value::Array(items) => {
                let txs = items
                    .into_iter()
                    .map(|item| {
                        serde_json::from_value::<RawTx>(item)
                            .map_err(|e| AppError::Decoding(format!("Invalid explorer entry: {}", e)))
                            .and_then(RawTx::into_explorer_tx)
                    })
                    .collect::<Result<Vec<_>>>()?;
                tracing::debug!(tx_count = txs.len(), "Explorer history fetched");
                Ok(txs)
            }
            _ if envelope.message == NO_TRANSACTIONS => Ok(Vec::new()),
            Value::String(reason) => Err(AppError::Rpc(format!("Explorer error: {}", reason))),
            other => Err(AppError::Decoding(format!(
                "Unexpected explorer result ({}): {}",
                envelope.message, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::test_server;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn client_for(body: Value) -> EtherscanClient {
        let router = Router::new().route(
            "/api",
            get(move |Query(params): Query<HashMap<String, String>>| {
                let body = body.clone();
                async move {
                    assert_eq!(params.get("action").map(String::as_str), Some("txlist"));
                    assert_eq!(params.get("sort").map(String::as_str), Some("desc"));
                    Json(body)
                }
            }),
        );
        let url = test_server::spawn(router).await;
        EtherscanClient::new(format!("{}/api", url), Some("key".into()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_parses_history() {
        let client = client_for(json!({
            "status": "1",
            "message": "OK",
            "result": [
                {"from": "0xaa", "to": "0xbb", "value": "500000000000000000",
                 "timeStamp": "1700000000", "isError": "0", "hash": "0x01"},
                {"from": "0xcc", "to": "0xdd", "value": "2200000000000000000",
                 "timeStamp": "1699990000", "isError": "1", "hash": "0x02"}
            ]
        }))
        .await;

        let txs = client.account_transactions("0xaa", 10).await.unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].value.to_string(), "0.5");
        assert_eq!(txs[0].status, TxStatus::Success);
        assert_eq!(txs[1].status, TxStatus::Failed);
        assert_eq!(txs[1].timestamp, 1_699_990_000);
    }

    #[tokio::test]
    async fn test_no_transactions_is_empty() {
        let client = client_for(json!({"status": "0", "message": NO_TRANSACTIONS, "result": []})).await;
        assert!(client.account_transactions("0xaa", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_string_result_is_error() {
        let client = client_for(json!({"status": "0", "message": "NOTOK", "result": "Invalid API Key"})).await;
        let err = client.account_transactions("0xaa", 10).await.unwrap_err();
        assert!(err.to_string().contains("Invalid API Key"));
    }
}
