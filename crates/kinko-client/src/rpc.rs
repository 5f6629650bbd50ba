//! json-rpc node client
//!
//! four node operations back the lifecycle: account resolution, simulation,
//! submission and status queries. `NodeClient` is plain injected state,
//! constructed once by whoever owns the escrow client and reused across
//! calls; there is no process-wide handle

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::envelope::{Envelope, SignedEnvelope};
use crate::types::{AccountState, Simulation, SubmitReceipt, TxStatus};

/// rpc-level failure, before any lifecycle interpretation
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("node error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// the node surface the driver needs
///
/// implemented by `NodeClient` for production and by scripted mocks in tests
pub trait RpcNode: Send + Sync {
    /// resolve an account's sequence state and balance
    fn account(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<AccountState, RpcError>> + Send;

    /// dry-run an envelope against current ledger state
    fn simulate(
        &self,
        envelope: &Envelope,
    ) -> impl Future<Output = Result<Simulation, RpcError>> + Send;

    /// submit a signed envelope
    fn submit(
        &self,
        signed: &SignedEnvelope,
    ) -> impl Future<Output = Result<SubmitReceipt, RpcError>> + Send;

    /// query confirmation status by hash
    fn transaction_status(
        &self,
        hash: &str,
    ) -> impl Future<Output = Result<TxStatus, RpcError>> + Send;
}

/// one shared node handle serves any number of clients
impl<T: RpcNode> RpcNode for Arc<T> {
    async fn account(&self, address: &str) -> Result<AccountState, RpcError> {
        (**self).account(address).await
    }

    async fn simulate(&self, envelope: &Envelope) -> Result<Simulation, RpcError> {
        (**self).simulate(envelope).await
    }

    async fn submit(&self, signed: &SignedEnvelope) -> Result<SubmitReceipt, RpcError> {
        (**self).submit(signed).await
    }

    async fn transaction_status(&self, hash: &str) -> Result<TxStatus, RpcError> {
        (**self).transaction_status(hash).await
    }
}

/// json-rpc 2.0 client over http
pub struct NodeClient {
    url: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    id: u32,
    method: &'a str,
    params: P,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Serialize)]
struct AccountParams<'a> {
    address: &'a str,
}

#[derive(Serialize)]
struct TxParams<'a> {
    transaction: &'a str,
}

#[derive(Serialize)]
struct HashParams<'a> {
    hash: &'a str,
}

#[derive(Deserialize)]
struct StatusResponse {
    status: TxStatus,
}

impl NodeClient {
    /// client owning one http connection pool, reused for its lifetime
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<T, RpcError> {
        tracing::debug!("rpc {} -> {}", method, self.url);

        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let response: RpcResponse<T> = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(RpcError::Node {
                code: err.code,
                message: err.message,
            });
        }

        response
            .result
            .ok_or_else(|| RpcError::Malformed("missing result".into()))
    }
}

impl RpcNode for NodeClient {
    async fn account(&self, address: &str) -> Result<AccountState, RpcError> {
        self.call("getAccount", AccountParams { address }).await
    }

    async fn simulate(&self, envelope: &Envelope) -> Result<Simulation, RpcError> {
        let transaction = hex::encode(envelope.encode_bytes());
        self.call(
            "simulateTransaction",
            TxParams {
                transaction: &transaction,
            },
        )
        .await
    }

    async fn submit(&self, signed: &SignedEnvelope) -> Result<SubmitReceipt, RpcError> {
        let transaction = hex::encode(signed.encode_bytes());
        self.call(
            "sendTransaction",
            TxParams {
                transaction: &transaction,
            },
        )
        .await
    }

    async fn transaction_status(&self, hash: &str) -> Result<TxStatus, RpcError> {
        let response: StatusResponse = self.call("getTransaction", HashParams { hash }).await?;
        Ok(response.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_error_surfaces_code_and_message() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32600,"message":"account not found"}}"#;
        let response: RpcResponse<AccountState> = serde_json::from_str(raw).unwrap();

        let err = response.error.unwrap();
        assert_eq!(err.code, -32600);
        assert_eq!(err.message, "account not found");
    }

    #[test]
    fn test_status_response_parses_wire_statuses() {
        let raw = r#"{"status":"NOT_FOUND"}"#;
        let response: StatusResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.status, TxStatus::NotFound);
    }
}
