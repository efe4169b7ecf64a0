// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

//! Amoy Wallet Server - Non-Custodial Polygon Amoy Wallet API
//!
//! This crate provides an HTTP API for wallet generation, native balance
//! lookup, server-funded transfers and AI-assisted transaction history
//! analysis on the Polygon Amoy testnet.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `chain` - Polygon Amoy integration (alloy)
//! - `explorer` - Etherscan v2 history fetcher
//! - `analysis` - Gemini transaction analysis client
//! - `service` - Wallet service orchestration

pub mod analysis;
pub mod api;
pub mod chain;
pub mod config;
pub mod error;
pub mod explorer;
pub mod models;
pub mod service;
pub mod state;
