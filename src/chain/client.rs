// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

//! Polygon Amoy client for blockchain interactions.
//!
//! [`AmoyClient`] wraps two alloy HTTP providers over the same endpoint: a
//! read provider for balance queries, and, when a server signing key is
//! configured, a wallet-filled provider for submitting native transfers.
//! The narrow [`ChainClient`] trait is what the service layer programs
//! against, so it can be exercised with an in-memory fake.

use std::time::Duration;

use alloy::{
    network::{Ethereum, EthereumWallet},
    primitives::{Address, U256},
    providers::{
        fillers::{
            BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller,
            WalletFiller,
        },
        Identity, Provider, ProviderBuilder, RootProvider,
    },
    signers::local::PrivateKeySigner,
    transports::{RpcError, TransportErrorKind},
};
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::types::{ChainError, NetworkConfig, TxConfirmation};

/// How long to wait for the single required confirmation before giving up.
const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// HTTP provider type for read-only queries (with all fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// HTTP provider type with signing capabilities.
type SigningProvider = FillProvider<
    JoinFill<
        JoinFill<
            Identity,
            JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
        >,
        WalletFiller<EthereumWallet>,
    >,
    RootProvider<Ethereum>,
>;

/// Narrow chain interface consumed by the wallet service.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Raw native balance of an address, in wei.
    async fn get_balance(&self, address: Address) -> Result<U256, ChainError>;

    /// Submit a native transfer from the server wallet and wait for at
    /// least one confirmation.
    async fn send_native(&self, to: Address, amount_wei: U256) -> Result<TxConfirmation, ChainError>;

    /// Address of the configured server signing key, if any.
    fn signer_address(&self) -> Option<Address>;
}

struct SigningContext {
    address: Address,
    provider: SigningProvider,
    // Submissions from the shared server key go out one at a time so nonce
    // assignment stays ordered across concurrent transfer requests.
    submit_lock: Mutex<()>,
}

/// Polygon Amoy client.
pub struct AmoyClient {
    /// Network configuration
    network: NetworkConfig,
    /// Read-only alloy HTTP provider
    provider: HttpProvider,
    /// Signing provider, present when a server key is configured
    signing: Option<SigningContext>,
}

impl AmoyClient {
    /// Create a new client for the specified network.
    ///
    /// When `signer` is provided, the client can submit transfers from
    /// that key; otherwise [`ChainClient::send_native`] fails with
    /// [`ChainError::SignerUnconfigured`].
    pub fn new(
        network: NetworkConfig,
        signer: Option<PrivateKeySigner>,
    ) -> Result<Self, ChainError> {
        let url: url::Url = network
            .rpc_url
            .parse()
            .map_err(|e: url::ParseError| ChainError::InvalidRpcUrl(e.to_string()))?;

        let provider = ProviderBuilder::new().connect_http(url.clone());

        let signing = signer.map(|signer| {
            let address = signer.address();
            let wallet = EthereumWallet::from(signer);
            SigningContext {
                address,
                provider: ProviderBuilder::new().wallet(wallet).connect_http(url),
                submit_lock: Mutex::new(()),
            }
        });

        Ok(Self {
            network,
            provider,
            signing,
        })
    }

    /// Get the current block number.
    pub async fn get_block_number(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }
}

#[async_trait]
impl ChainClient for AmoyClient {
    async fn get_balance(&self, address: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn send_native(
        &self,
        to: Address,
        amount_wei: U256,
    ) -> Result<TxConfirmation, ChainError> {
        let ctx = self.signing.as_ref().ok_or(ChainError::SignerUnconfigured)?;

        let _guard = ctx.submit_lock.lock().await;

        let tx = alloy::rpc::types::TransactionRequest::default()
            .to(to)
            .value(amount_wei);

        let pending = ctx
            .provider
            .send_transaction(tx)
            .await
            .map_err(classify_send_error)?;

        let tx_hash = format!("{:?}", pending.tx_hash());
        tracing::info!("Transaction submitted: {tx_hash}");

        let receipt = pending
            .with_required_confirmations(1)
            .with_timeout(Some(CONFIRMATION_TIMEOUT))
            .get_receipt()
            .await
            .map_err(|e| ChainError::Rpc(format!("Failed to confirm transaction: {e}")))?;

        if !receipt.status() {
            return Err(ChainError::TransactionFailed(format!(
                "Transaction {tx_hash} reverted"
            )));
        }

        Ok(TxConfirmation {
            explorer_url: self.network.tx_url(&tx_hash),
            block_number: receipt.block_number.unwrap_or(0),
            tx_hash,
        })
    }

    fn signer_address(&self) -> Option<Address> {
        self.signing.as_ref().map(|ctx| ctx.address)
    }
}

/// Classify a submission failure at the RPC boundary.
///
/// The JSON-RPC layer reports an underfunded sender only through the error
/// payload message, so the substring check lives here and nowhere above.
fn classify_send_error(err: RpcError<TransportErrorKind>) -> ChainError {
    if let Some(payload) = err.as_error_resp() {
        if is_insufficient_funds_message(&payload.message) {
            return ChainError::InsufficientFunds;
        }
    }
    ChainError::TransactionFailed(err.to_string())
}

fn is_insufficient_funds_message(message: &str) -> bool {
    message.to_ascii_lowercase().contains("insufficient funds")
}
