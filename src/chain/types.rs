// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

//! Chain types and constants for Polygon Amoy.

/// Number of decimals of the native currency.
pub const NATIVE_DECIMALS: u8 = 18;

/// Display label of the native currency.
pub const NATIVE_UNIT: &str = "MATIC";

/// Polygon Amoy chain ID.
pub const AMOY_CHAIN_ID: u64 = 80002;

const AMOY_NAME: &str = "Polygon Amoy Testnet";
const AMOY_RPC_URL: &str = "https://rpc-amoy.polygon.technology";
const AMOY_EXPLORER_URL: &str = "https://amoy.polygonscan.com";

/// Network configuration.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: String,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Block explorer URL
    pub explorer_url: String,
}

impl NetworkConfig {
    /// Polygon Amoy testnet with the public RPC endpoint.
    pub fn amoy() -> Self {
        Self {
            name: AMOY_NAME.to_string(),
            chain_id: AMOY_CHAIN_ID,
            rpc_url: AMOY_RPC_URL.to_string(),
            explorer_url: AMOY_EXPLORER_URL.to_string(),
        }
    }

    /// Polygon Amoy testnet with a custom RPC endpoint.
    pub fn amoy_with_rpc(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Self::amoy()
        }
    }

    /// Explorer link for a transaction hash.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}

/// Result of a submitted and confirmed transaction.
#[derive(Debug, Clone)]
pub struct TxConfirmation {
    /// Transaction hash
    pub tx_hash: String,
    /// Block number where the transaction was included
    pub block_number: u64,
    /// Explorer URL for the transaction
    pub explorer_url: String,
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("No signing key configured")]
    SignerUnconfigured,

    #[error("Insufficient funds in the submitting wallet")]
    InsufficientFunds,

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_url_interpolates_hash() {
        let network = NetworkConfig::amoy();
        assert_eq!(
            network.tx_url("0xabc123"),
            "https://amoy.polygonscan.com/tx/0xabc123"
        );
    }

    #[test]
    fn custom_rpc_keeps_other_defaults() {
        let network = NetworkConfig::amoy_with_rpc("http://localhost:8545");
        assert_eq!(network.rpc_url, "http://localhost:8545");
        assert_eq!(network.chain_id, AMOY_CHAIN_ID);
        assert_eq!(network.explorer_url, AMOY_EXPLORER_URL);
    }
}
