// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

//! Wallet endpoints: create, balance, transfer, analyze.
//!
//! Handlers own input validation. Addresses and amounts are checked and
//! parsed here, before the service touches any network; the service only
//! ever sees typed values.

use std::str::FromStr;

use alloy::primitives::{Address, U256};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    chain::{parse_amount, NATIVE_DECIMALS},
    error::ApiError,
    models::{AnalysisResult, ApiResponse, BalanceResult, TransferResult, Wallet},
    state::AppState,
};

/// Request to transfer funds from the server wallet.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TransferRequest {
    /// Recipient address (0x + 40 hex chars).
    #[serde(rename = "toAddress")]
    pub to_address: Option<String>,
    /// Amount in whole MATIC, as a decimal string (e.g., "1.5").
    pub amount: Option<String>,
}

// =============================================================================
// Validation Helpers
// =============================================================================

/// Validate and parse an EVM address path or body parameter.
fn parse_address(raw: &str, message: &str) -> Result<Address, ApiError> {
    let trimmed = raw.trim();
    if !trimmed.starts_with("0x") {
        return Err(ApiError::bad_request(message));
    }
    Address::from_str(trimmed).map_err(|_| ApiError::bad_request(message))
}

/// Validate and parse a transfer amount. Must be a finite positive
/// decimal with at most 18 fractional digits.
fn parse_positive_amount(raw: &str) -> Result<U256, ApiError> {
    let invalid = || ApiError::bad_request("Invalid amount. Must be a positive number.");

    let amount_wei = parse_amount(raw, NATIVE_DECIMALS).map_err(|_| invalid())?;
    if amount_wei.is_zero() {
        return Err(invalid());
    }
    Ok(amount_wei)
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a new wallet.
///
/// Generates a fresh keypair and recovery phrase. The server does not
/// store any of it.
#[utoipa::path(
    post,
    path = "/api/v1/wallet/create",
    tag = "Wallet",
    responses(
        (status = 200, description = "Wallet created", body = Wallet),
        (status = 500, description = "Key generation failed")
    )
)]
pub async fn create_wallet(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Wallet>>, ApiError> {
    let wallet = state.service.create_wallet()?;

    Ok(Json(ApiResponse::with_message(
        "Wallet created successfully. Save these credentials securely. The server does NOT store them.",
        wallet,
    )))
}

/// Get the native MATIC balance of an address.
#[utoipa::path(
    get,
    path = "/api/v1/wallet/balance/{address}",
    tag = "Wallet",
    params(
        ("address" = String, Path, description = "EVM address (0x + 40 hex chars)")
    ),
    responses(
        (status = 200, description = "Balance retrieved", body = BalanceResult),
        (status = 400, description = "Invalid address"),
        (status = 500, description = "Chain RPC failure")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<BalanceResult>>, ApiError> {
    let address = parse_address(&address, "Invalid or missing wallet address")?;

    let balance = state.service.get_balance(address).await?;

    Ok(Json(ApiResponse::with_message(
        "Wallet balance retrieved successfully",
        balance,
    )))
}

/// Simulate a P2P transfer funded by the server wallet.
///
/// Submits a native transfer and responds only after the transaction has
/// at least one confirmation.
#[utoipa::path(
    post,
    path = "/api/v1/wallet/transfer",
    tag = "Wallet",
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Transfer confirmed", body = TransferResult),
        (status = 400, description = "Invalid recipient or amount"),
        (status = 500, description = "Unconfigured or underfunded server wallet, or submission failure")
    )
)]
pub async fn simulate_transfer(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<ApiResponse<TransferResult>>, ApiError> {
    let (to_raw, amount_raw) = match (&request.to_address, &request.amount) {
        (Some(to), Some(amount)) => (to, amount),
        _ => {
            return Err(ApiError::bad_request(
                "Missing required fields: toAddress and amount",
            ))
        }
    };

    let to = parse_address(to_raw, "Invalid recipient address (toAddress)")?;
    let amount_wei = parse_positive_amount(amount_raw)?;

    let result = state
        .service
        .simulate_transfer(to, amount_wei, amount_raw)
        .await?;

    Ok(Json(ApiResponse::with_message(
        "Transfer simulation successful.",
        result,
    )))
}

/// Analyze a wallet's recent activity with the language model.
#[utoipa::path(
    get,
    path = "/api/v1/wallet/analyze/{address}",
    tag = "Wallet",
    params(
        ("address" = String, Path, description = "EVM address (0x + 40 hex chars)")
    ),
    responses(
        (status = 200, description = "Analysis produced", body = AnalysisResult),
        (status = 400, description = "Invalid address"),
        (status = 500, description = "Analysis service failure")
    )
)]
pub async fn analyze_wallet(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<AnalysisResult>>, ApiError> {
    let address = parse_address(&address, "Invalid or missing wallet address")?;

    let analysis = state.service.analyze_wallet(address).await?;

    Ok(Json(ApiResponse::new(analysis)))
}
