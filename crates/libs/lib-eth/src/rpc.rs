//! # JSON-RPC Transport
//!
//! A minimal JSON-RPC 2.0 client over HTTP and the wallet provider built on it.
//! Works against any EIP-1193-style endpoint that manages accounts itself (a
//! local development node, a signer proxy, a wallet bridge).
//!
//! ## Example
//!
//! ```rust,no_run
//! use lib_eth::rpc::RpcWalletProvider;
//! use lib_eth::WalletProvider;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), lib_eth::ProviderError> {
//! let provider = RpcWalletProvider::new("http://127.0.0.1:8545", Duration::from_secs(10))?;
//! let accounts = provider.request_accounts(false).await?;
//! println!("authorized: {:?}", accounts);
//! # Ok(())
//! # }
//! ```

use crate::provider::{ProviderError, WalletProvider};
use crate::types::TransactionRequest;
use alloy_primitives::B256;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 client with a shared connection pool.
pub struct JsonRpcClient {
    http: Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call `method` with positional `params` and decode the `result` member.
    #[tracing::instrument(skip(self, params), fields(url = %self.url))]
    pub async fn request<R: DeserializeOwned>(&self, method: &str, params: Value) -> Result<R, ProviderError> {
        let start = std::time::Instant::now();
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "RPC network error");
                ProviderError::Transport(e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        // Nodes report JSON-RPC errors with 4xx/5xx too; prefer the error object when present.
        let parsed: RpcResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                tracing::warn!(status = status.as_u16(), "RPC request failed");
                return Err(ProviderError::Transport(format!("HTTP status {}", status)));
            }
            Err(e) => return Err(ProviderError::Decode(format!("Invalid JSON-RPC response: {}", e))),
        };

        if let Some(error) = parsed.error {
            tracing::debug!(
                code = error.code,
                message = %error.message,
                duration_ms = start.elapsed().as_millis(),
                "RPC returned error"
            );
            return Err(ProviderError::from_rpc(error.code, error.message));
        }

        tracing::debug!(duration_ms = start.elapsed().as_millis(), "RPC call succeeded");

        serde_json::from_value(parsed.result)
            .map_err(|e| ProviderError::Decode(format!("Unexpected `{}` result: {}", method, e)))
    }
}

/// Wallet provider backed by a JSON-RPC endpoint that owns the accounts.
pub struct RpcWalletProvider {
    client: JsonRpcClient,
}

impl RpcWalletProvider {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: JsonRpcClient::new(url, timeout)?,
        })
    }

    pub fn client(&self) -> &JsonRpcClient {
        &self.client
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    fn is_present(&self) -> bool {
        true
    }

    async fn request_accounts(&self, prompting: bool) -> Result<Vec<String>, ProviderError> {
        let method = if prompting { "eth_requestAccounts" } else { "eth_accounts" };
        self.client.request(method, json!([])).await
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<B256, ProviderError> {
        self.client.request("eth_sendTransaction", json!([tx])).await
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    //! Throw-away local HTTP server for exercising the clients.

    use axum::Router;
    use tokio::net::TcpListener;

    /// Serve `router` on an ephemeral port and return its base URL.
    pub async fn spawn(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};

    async fn node(Json(req): Json<Value>) -> Json<Value> {
        let id = req["id"].clone();
        let reply = match req["method"].as_str() {
            Some("eth_accounts") => json!({ "jsonrpc": "2.0", "id": id, "result": [] }),
            Some("eth_requestAccounts") => json!({
                "jsonrpc": "2.0", "id": id,
                "result": ["0x742d35cc6634c0532925a3b8d4c9db96590c6c87"]
            }),
            Some("eth_sendTransaction") => json!({
                "jsonrpc": "2.0", "id": id,
                "error": { "code": 4001, "message": "User denied transaction signature" }
            }),
            _ => json!({
                "jsonrpc": "2.0", "id": id,
                "error": { "code": -32601, "message": "method not found" }
            }),
        };
        Json(reply)
    }

    async fn provider() -> RpcWalletProvider {
        let url = test_server::spawn(Router::new().route("/", post(node))).await;
        RpcWalletProvider::new(&url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_non_prompting_and_prompting_accounts() {
        let provider = provider().await;
        assert!(provider.request_accounts(false).await.unwrap().is_empty());
        assert_eq!(
            provider.request_accounts(true).await.unwrap(),
            vec!["0x742d35cc6634c0532925a3b8d4c9db96590c6c87".to_string()]
        );
    }

    #[tokio::test]
    async fn test_rejection_code_is_classified() {
        let provider = provider().await;
        let tx = TransactionRequest::transfer(
            alloy_primitives::Address::ZERO,
            alloy_primitives::Address::ZERO,
            alloy_primitives::U256::from(1u64),
        );
        assert_eq!(
            provider.send_transaction(tx).await,
            Err(ProviderError::UserRejected)
        );
    }

    #[tokio::test]
    async fn test_unknown_method_is_rpc_error() {
        let provider = provider().await;
        let result: Result<Value, _> = provider.client().request("eth_chainId", json!([])).await;
        assert!(matches!(result, Err(ProviderError::Rpc { code: -32601, .. })));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) is not listening on loopback in test environments.
        let provider = RpcWalletProvider::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        assert!(matches!(
            provider.request_accounts(false).await,
            Err(ProviderError::Transport(_))
        ));
    }
}
