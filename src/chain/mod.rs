// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

//! Blockchain integration module for Polygon Amoy.
//!
//! This module provides functionality for:
//! - Generating wallets (keypair + recovery phrase)
//! - Querying native MATIC balances
//! - Submitting and confirming native transfers from the server wallet

pub mod amount;
pub mod client;
pub mod signing;
pub mod types;

pub use amount::{format_amount, parse_amount};
pub use client::{AmoyClient, ChainClient};
pub use signing::{generate_wallet, signer_from_hex, GeneratedWallet};
pub use types::*;
