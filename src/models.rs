// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

//! # API Data Models
//!
//! Response payloads for the wallet API. All types are immutable once
//! constructed and derive `Serialize` plus `ToSchema` for JSON handling and
//! OpenAPI documentation. Wire field names follow the API contract
//! (camelCase where the client expects it).

use serde::Serialize;
use utoipa::ToSchema;

/// Uniform success envelope: `{ success, message?, data }`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always `true` for success responses.
    pub success: bool,
    /// Optional human-readable status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Operation result payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Success envelope without a message.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    /// Success envelope with a status message.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

/// A freshly generated wallet.
///
/// Exists only for the duration of the response. The server never stores
/// the private key or mnemonic.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Wallet {
    /// EIP-55 checksummed address.
    pub address: String,
    /// Hex-encoded private key (`0x` + 64 hex chars).
    #[serde(rename = "privateKey")]
    pub private_key: String,
    /// BIP-39 recovery phrase.
    pub mnemonic: String,
}

/// Native balance of an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BalanceResult {
    /// The queried address, checksummed.
    pub address: String,
    /// Balance in whole MATIC, exact decimal string (`raw / 10^18`).
    pub balance: String,
    /// Currency label.
    pub unit: String,
}

/// Outcome of a confirmed server-funded transfer.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    /// Always `true`; the result exists only after ≥1 confirmation.
    pub success: bool,
    /// Server wallet address the funds were sent from.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Transferred amount in whole MATIC, as requested.
    pub amount: String,
    /// Currency label.
    pub unit: String,
    /// Hash of the confirmed transaction.
    pub transaction_hash: String,
    /// Block explorer link for the transaction.
    pub explorer_url: String,
}

/// A simplified history record, as handed to the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    /// `"Sent"` or `"Received"`, relative to the queried address.
    #[serde(rename = "type")]
    pub kind: String,
    /// Recipient address (may be empty for contract creations).
    pub to: String,
    /// Sender address.
    pub from: String,
    /// Transferred value in whole MATIC.
    pub value: String,
    /// RFC 3339 UTC timestamp, or `"N/A"` when the record carries none.
    pub timestamp: String,
}

/// Language-model summary of a wallet's recent activity.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnalysisResult {
    /// Free-text analysis, or the fixed sentinel for empty wallets.
    pub analysis: String,
}
