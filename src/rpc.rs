//! Aptos fullnode REST access.
//!
//! `LedgerRpc` is the narrow surface the gift list needs (view calls and
//! transaction lookup); `RestClient` implements it over reqwest and also
//! carries the extra endpoints the local-key wallet uses to build and submit
//! transactions.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::RpcError;
use crate::types::{u64_from_string_or_number, TransactionInfo, ViewRequest};

#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// `POST /v1/view`
    async fn view(&self, request: &ViewRequest) -> Result<serde_json::Value, RpcError>;

    /// `GET /v1/transactions/by_hash/{hash}`
    async fn transaction_by_hash(&self, hash: &str) -> Result<TransactionInfo, RpcError>;
}

/// Subset of `GET /v1` used for the network status panel.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerInfo {
    pub chain_id: u8,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub ledger_version: u64,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub block_height: u64,
}

#[derive(Debug, Deserialize)]
struct AccountResource {
    #[serde(deserialize_with = "u64_from_string_or_number")]
    sequence_number: u64,
}

#[derive(Debug, Deserialize)]
struct GasEstimate {
    gas_estimate: u64,
}

#[derive(Clone)]
pub struct RestClient {
    base: String,
    http: reqwest::Client,
}

impl RestClient {
    pub fn new(base: Url, timeout_secs: u64) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(RpcError::from)?;
        Ok(Self {
            base: normalize_base(&base),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, RpcError> {
        let raw = format!("{}/v1/{}", self.base, path.trim_start_matches('/'));
        Url::parse(&raw).map_err(|_| RpcError::InvalidUrl(raw))
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, RpcError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::Status {
                code: status.as_u16(),
                body: body.chars().take(300).collect(),
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RpcError> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;
        Self::read(response).await
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RpcError> {
        let url = self.endpoint(path)?;
        debug!("POST {}", url);
        let response = self
            .http
            .post(url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;
        Self::read(response).await
    }

    pub async fn ledger_info(&self) -> Result<LedgerInfo, RpcError> {
        self.get_json("").await
    }

    pub async fn account_sequence_number(&self, address: &str) -> Result<u64, RpcError> {
        let account: AccountResource = self.get_json(&format!("accounts/{}", address)).await?;
        Ok(account.sequence_number)
    }

    pub async fn estimate_gas_price(&self) -> Result<u64, RpcError> {
        let estimate: GasEstimate = self.get_json("estimate_gas_price").await?;
        Ok(estimate.gas_estimate)
    }

    /// Ask the node for the BCS signing message of an unsigned transaction. Returns hex.
    pub async fn encode_submission(&self, body: &serde_json::Value) -> Result<String, RpcError> {
        self.post_json("transactions/encode_submission", body).await
    }

    pub async fn submit_transaction(&self, body: &serde_json::Value) -> Result<TransactionInfo, RpcError> {
        self.post_json("transactions", body).await
    }
}

#[async_trait]
impl LedgerRpc for RestClient {
    async fn view(&self, request: &ViewRequest) -> Result<serde_json::Value, RpcError> {
        self.post_json("view", request).await
    }

    async fn transaction_by_hash(&self, hash: &str) -> Result<TransactionInfo, RpcError> {
        self.get_json(&format!("transactions/by_hash/{}", hash)).await
    }
}

/// Drop trailing slashes and a trailing `/v1` so users may paste either form.
fn normalize_base(url: &Url) -> String {
    let raw = url.as_str().trim_end_matches('/');
    raw.strip_suffix("/v1").unwrap_or(raw).to_string()
}
