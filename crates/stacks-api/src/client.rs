//! Node Client - HTTP implementation and the trait seam
//!
//! `NodeClient` is the boundary the workflow crates program against; the
//! HTTP implementation talks to a hosted node, tests substitute an
//! in-memory fake.

use crate::error::ApiError;
use crate::types::{AccountInfo, BroadcastResponse, CallReadResult, ContractId};
use async_trait::async_trait;
use serde_json::json;
use stacks_codec::Network;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Read and broadcast operations against a Stacks node
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// POST a read-only function call; no side effects on chain
    async fn call_read_only(
        &self,
        contract: &ContractId,
        function: &str,
    ) -> Result<CallReadResult, ApiError>;

    /// Current confirmed ordering nonce for an account
    async fn account_nonce(&self, address: &str) -> Result<u64, ApiError>;

    /// Broadcast signed transaction bytes, returning the accepted txid
    async fn broadcast(&self, tx: &[u8]) -> Result<String, ApiError>;
}

/// `NodeClient` over the hosted node HTTP API
#[derive(Debug, Clone)]
pub struct HttpNodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpNodeClient {
    /// Client for a well-known network endpoint
    pub fn new(network: Network) -> Self {
        Self::with_base_url(network.api_base())
    }

    /// Client for an arbitrary node URL (local nodes, tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl NodeClient for HttpNodeClient {
    async fn call_read_only(
        &self,
        contract: &ContractId,
        function: &str,
    ) -> Result<CallReadResult, ApiError> {
        let url = format!(
            "{}/v2/contracts/call-read/{}/{}/{}",
            self.base_url,
            contract.owner_c32(),
            contract.name(),
            function
        );
        let body = json!({
            "sender": contract.owner_c32(),
            "arguments": [],
        });

        tracing::debug!("read-only call {}::{}", contract, function);
        let response = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    async fn account_nonce(&self, address: &str) -> Result<u64, ApiError> {
        let url = format!("{}/v2/accounts/{}?proof=0", self.base_url, address);

        let response = self.http.get(&url).timeout(REQUEST_TIMEOUT).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let info: AccountInfo = response.json().await?;
        tracing::debug!("account {} nonce {}", address, info.nonce);
        Ok(info.nonce)
    }

    async fn broadcast(&self, tx: &[u8]) -> Result<String, ApiError> {
        let url = format!("{}/v2/transactions", self.base_url);

        let response = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(tx.to_vec())
            .send()
            .await?;

        // rejections come back as structured JSON on a non-2xx status, so
        // parse the body before deciding on the status code
        let status = response.status();
        let body = response.text().await?;
        match serde_json::from_str::<BroadcastResponse>(&body) {
            Ok(BroadcastResponse::Accepted { txid }) => {
                tracing::info!("transaction broadcast accepted: {}", txid);
                Ok(txid)
            }
            Ok(BroadcastResponse::Rejected { error, reason }) => {
                tracing::warn!(
                    "transaction broadcast rejected: {} (reason: {:?})",
                    error,
                    reason
                );
                Err(ApiError::Rejected { error, reason })
            }
            Err(_) if !status.is_success() => Err(ApiError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(ApiError::Malformed(e)),
        }
    }
}
