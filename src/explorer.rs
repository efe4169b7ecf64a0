// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

//! Block explorer integration for transaction history.
//!
//! Wraps the Etherscan v2 multichain API. Two account actions are exposed:
//! `txlist` (direct transactions) and `txlistinternal` (contract-mediated
//! transfers). Provider-side "no results" responses map to an empty list,
//! and a missing API key degrades every fetch to an empty list instead of
//! failing the request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const NO_TRANSACTIONS_MESSAGE: &str = "No transactions found";

/// Transaction category queried from the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxCategory {
    /// Direct externally-owned-account transactions (`txlist`).
    Normal,
    /// Internal, contract-mediated transfers (`txlistinternal`).
    Internal,
}

impl TxCategory {
    /// Etherscan `action` parameter for this category.
    pub fn action(self) -> &'static str {
        match self {
            TxCategory::Normal => "txlist",
            TxCategory::Internal => "txlistinternal",
        }
    }
}

/// A raw transaction record as returned by the explorer.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerTx {
    /// Sender address (lowercase hex).
    pub from: String,
    /// Recipient address; empty for contract creations.
    #[serde(default)]
    pub to: String,
    /// Transferred value in wei, decimal string.
    pub value: String,
    /// Unix timestamp in seconds, decimal string.
    #[serde(rename = "timeStamp", default)]
    pub time_stamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("Explorer request failed: {0}")]
    Request(String),

    #[error("Explorer response was invalid: {0}")]
    InvalidResponse(String),
}

/// Narrow history interface consumed by the wallet service.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetch one category of transactions for an address, most recent
    /// first. "No results" is an empty list, not an error.
    async fn fetch_transactions(
        &self,
        address: &str,
        category: TxCategory,
    ) -> Result<Vec<ExplorerTx>, ExplorerError>;
}

/// Etherscan v2 API client.
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    api_url: String,
    api_key: Option<String>,
    chain_id: u64,
    http: Client,
}

/// Response envelope shared by all account actions. `result` is an array
/// on success and a bare string on provider-side errors.
#[derive(Debug, Deserialize)]
struct EtherscanEnvelope {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

impl EtherscanClient {
    /// Create a new explorer client.
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        chain_id: u64,
    ) -> Result<Self, ExplorerError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ExplorerError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_url: api_url.into(),
            api_key,
            chain_id,
            http,
        })
    }
}

#[async_trait]
impl HistoryProvider for EtherscanClient {
    async fn fetch_transactions(
        &self,
        address: &str,
        category: TxCategory,
    ) -> Result<Vec<ExplorerTx>, ExplorerError> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!(
                "No explorer API key configured; returning empty {} history",
                category.action()
            );
            return Ok(Vec::new());
        };

        let chain_id = self.chain_id.to_string();
        let response = self
            .http
            .get(&self.api_url)
            .query(&[
                ("module", "account"),
                ("action", category.action()),
                ("address", address),
                ("startblock", "0"),
                ("endblock", "9999999999"),
                ("page", "1"),
                ("offset", "50"),
                ("sort", "desc"),
                ("apikey", api_key),
                ("chainid", &chain_id),
            ])
            .send()
            .await
            .map_err(|e| ExplorerError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ExplorerError::Request(format!(
                "explorer returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ExplorerError::Request(e.to_string()))?;

        parse_envelope(&body)
    }
}

/// Decode an Etherscan envelope into transaction records.
fn parse_envelope(body: &str) -> Result<Vec<ExplorerTx>, ExplorerError> {
    let envelope: EtherscanEnvelope =
        serde_json::from_str(body).map_err(|e| ExplorerError::InvalidResponse(e.to_string()))?;

    // Status "0" covers both "no transactions" and provider-side errors;
    // either way there is nothing usable in `result`.
    if envelope.status == "0" || envelope.message == NO_TRANSACTIONS_MESSAGE {
        return Ok(Vec::new());
    }

    serde_json::from_value(envelope.result)
        .map_err(|e| ExplorerError::InvalidResponse(e.to_string()))
}
