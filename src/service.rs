// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

//! Wallet service orchestrating the chain client, history fetcher and
//! analysis client.
//!
//! All inputs arrive already validated and typed (addresses as
//! [`Address`], amounts as wei). Failures from the leaves are reclassified
//! into [`ServiceError`] here; nothing below the HTTP layer produces a
//! response shape.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use chrono::{DateTime, SecondsFormat};
use tracing::warn;

use crate::{
    analysis::{AnalysisError, AnalysisProvider},
    chain::{
        format_amount, generate_wallet, ChainClient, ChainError, NATIVE_DECIMALS, NATIVE_UNIT,
    },
    explorer::{ExplorerTx, HistoryProvider, TxCategory},
    models::{AnalysisResult, BalanceResult, TransactionRecord, TransferResult, Wallet},
};

/// Fixed analysis returned for wallets with no history. Short-circuits the
/// language-model call entirely.
pub const EMPTY_HISTORY_ANALYSIS: &str = "This wallet has no transaction history.";

/// Maximum number of history records retained after merging, and thus the
/// most the analysis service ever sees.
pub const HISTORY_LIMIT: usize = 20;

/// Timestamp sentinel for records without one.
const TIMESTAMP_UNAVAILABLE: &str = "N/A";

/// Failures of wallet operations, classified for the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Server wallet private key is not configured")]
    SignerUnconfigured,

    #[error("Server wallet has insufficient funds")]
    InsufficientFunds,

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Chain RPC failure: {0}")]
    Chain(String),

    #[error("{0}")]
    Transfer(String),

    #[error("{0}")]
    Analysis(String),
}

impl From<ChainError> for ServiceError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::InsufficientFunds => ServiceError::InsufficientFunds,
            ChainError::SignerUnconfigured => ServiceError::SignerUnconfigured,
            ChainError::KeyGeneration(detail) => ServiceError::KeyGeneration(detail),
            ChainError::TransactionFailed(detail) => ServiceError::Transfer(detail),
            other => ServiceError::Chain(other.to_string()),
        }
    }
}

impl From<AnalysisError> for ServiceError {
    fn from(err: AnalysisError) -> Self {
        ServiceError::Analysis(err.to_string())
    }
}

/// Orchestrates wallet operations over the three external adapters.
pub struct WalletService {
    chain: Arc<dyn ChainClient>,
    history: Arc<dyn HistoryProvider>,
    analysis: Arc<dyn AnalysisProvider>,
}

impl WalletService {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        history: Arc<dyn HistoryProvider>,
        analysis: Arc<dyn AnalysisProvider>,
    ) -> Self {
        Self {
            chain,
            history,
            analysis,
        }
    }

    /// Generate a fresh wallet. Nothing is stored; the response is the
    /// only copy of the key material.
    pub fn create_wallet(&self) -> Result<Wallet, ServiceError> {
        let generated =
            generate_wallet().map_err(|e| ServiceError::KeyGeneration(e.to_string()))?;

        Ok(Wallet {
            address: generated.address,
            private_key: generated.private_key,
            mnemonic: generated.mnemonic,
        })
    }

    /// Native balance of an address, converted exactly to whole MATIC.
    pub async fn get_balance(&self, address: Address) -> Result<BalanceResult, ServiceError> {
        let raw = self.chain.get_balance(address).await?;

        Ok(BalanceResult {
            address: address.to_checksum(None),
            balance: format_amount(raw, NATIVE_DECIMALS),
            unit: NATIVE_UNIT.to_string(),
        })
    }

    /// Send `amount_wei` from the server wallet to `to` and wait for one
    /// confirmation. `amount` is the caller's decimal string, echoed back
    /// in the result.
    pub async fn simulate_transfer(
        &self,
        to: Address,
        amount_wei: U256,
        amount: &str,
    ) -> Result<TransferResult, ServiceError> {
        let from = self
            .chain
            .signer_address()
            .ok_or(ServiceError::SignerUnconfigured)?;

        tracing::info!("Sending {amount} {NATIVE_UNIT} from {from} to {to}");
        let confirmation = self.chain.send_native(to, amount_wei).await?;
        tracing::info!(
            "Transaction confirmed in block {}: {}",
            confirmation.block_number,
            confirmation.tx_hash
        );

        Ok(TransferResult {
            success: true,
            from: from.to_checksum(None),
            to: to.to_checksum(None),
            amount: amount.to_string(),
            unit: NATIVE_UNIT.to_string(),
            transaction_hash: confirmation.tx_hash,
            explorer_url: confirmation.explorer_url,
        })
    }

    /// Recent history of an address: both explorer categories fetched
    /// concurrently, merged, sorted by descending timestamp and truncated
    /// to [`HISTORY_LIMIT`] records.
    pub async fn wallet_history(&self, address: Address) -> Vec<TransactionRecord> {
        let owner = address.to_checksum(None);

        let (normal, internal) = tokio::join!(
            self.fetch_category(&owner, TxCategory::Normal),
            self.fetch_category(&owner, TxCategory::Internal),
        );

        let mut stamped: Vec<(u64, ExplorerTx)> = normal
            .into_iter()
            .chain(internal)
            .map(|tx| (tx.time_stamp.parse().unwrap_or(0), tx))
            .collect();

        stamped.sort_by(|a, b| b.0.cmp(&a.0));
        stamped.truncate(HISTORY_LIMIT);

        stamped
            .iter()
            .map(|(_, tx)| to_record(tx, &owner))
            .collect()
    }

    /// Summarize an address's recent activity. Empty histories return the
    /// fixed sentinel without touching the analysis service.
    pub async fn analyze_wallet(&self, address: Address) -> Result<AnalysisResult, ServiceError> {
        let history = self.wallet_history(address).await;

        if history.is_empty() {
            return Ok(AnalysisResult {
                analysis: EMPTY_HISTORY_ANALYSIS.to_string(),
            });
        }

        let analysis = self.analysis.analyze_history(&history).await?;
        Ok(AnalysisResult { analysis })
    }

    /// Fetch one category, degrading to an empty list on failure so the
    /// other category still contributes.
    async fn fetch_category(&self, address: &str, category: TxCategory) -> Vec<ExplorerTx> {
        match self.history.fetch_transactions(address, category).await {
            Ok(txs) => txs,
            Err(err) => {
                warn!(
                    "Failed to fetch {} transactions for {address}: {err}",
                    category.action()
                );
                Vec::new()
            }
        }
    }
}

/// Derive the simplified record the analysis service consumes.
fn to_record(tx: &ExplorerTx, owner: &str) -> TransactionRecord {
    // Explorer addresses come back lowercase while the queried address is
    // checksummed, so the direction check must ignore case.
    let kind = if tx.from.eq_ignore_ascii_case(owner) {
        "Sent"
    } else {
        "Received"
    };

    let value = tx
        .value
        .parse::<U256>()
        .map(|wei| format_amount(wei, NATIVE_DECIMALS))
        .unwrap_or_else(|_| "0".to_string());

    let timestamp = tx
        .time_stamp
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| TIMESTAMP_UNAVAILABLE.to_string());

    TransactionRecord {
        kind: kind.to_string(),
        to: tx.to.clone(),
        from: tx.from.clone(),
        value,
        timestamp,
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory adapter fakes used by service and handler tests.

    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use alloy::primitives::{Address, U256};
    use async_trait::async_trait;

    use crate::{
        analysis::{AnalysisError, AnalysisProvider},
        chain::{ChainClient, ChainError, NetworkConfig, TxConfirmation},
        explorer::{ExplorerError, ExplorerTx, HistoryProvider, TxCategory},
        models::TransactionRecord,
    };

    pub struct FakeChain {
        pub balance: U256,
        pub signer: Option<Address>,
        pub send_error: Option<ChainError>,
        pub balance_calls: AtomicUsize,
        pub send_calls: AtomicUsize,
    }

    impl FakeChain {
        pub fn new(balance: U256, signer: Option<Address>) -> Self {
            Self {
                balance,
                signer,
                send_error: None,
                balance_calls: AtomicUsize::new(0),
                send_calls: AtomicUsize::new(0),
            }
        }

        pub fn failing_with(mut self, error: ChainError) -> Self {
            self.send_error = Some(error);
            self
        }

        pub fn network_calls(&self) -> usize {
            self.balance_calls.load(Ordering::SeqCst) + self.send_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChainClient for FakeChain {
        async fn get_balance(&self, _address: Address) -> Result<U256, ChainError> {
            self.balance_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.balance)
        }

        async fn send_native(
            &self,
            _to: Address,
            _amount_wei: U256,
        ) -> Result<TxConfirmation, ChainError> {
            self.send_calls.fetch_add(1, Ordering::SeqCst);
            match &self.send_error {
                Some(ChainError::InsufficientFunds) => Err(ChainError::InsufficientFunds),
                Some(ChainError::TransactionFailed(msg)) => {
                    Err(ChainError::TransactionFailed(msg.clone()))
                }
                Some(other) => Err(ChainError::Rpc(other.to_string())),
                None => Ok(TxConfirmation {
                    tx_hash: "0xfeed".to_string(),
                    block_number: 42,
                    explorer_url: NetworkConfig::amoy().tx_url("0xfeed"),
                }),
            }
        }

        fn signer_address(&self) -> Option<Address> {
            self.signer
        }
    }

    pub struct FakeHistory {
        pub normal: Mutex<Result<Vec<ExplorerTx>, String>>,
        pub internal: Mutex<Result<Vec<ExplorerTx>, String>>,
        pub calls: AtomicUsize,
    }

    impl FakeHistory {
        pub fn new(
            normal: Result<Vec<ExplorerTx>, String>,
            internal: Result<Vec<ExplorerTx>, String>,
        ) -> Self {
            Self {
                normal: Mutex::new(normal),
                internal: Mutex::new(internal),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn empty() -> Self {
            Self::new(Ok(Vec::new()), Ok(Vec::new()))
        }
    }

    #[async_trait]
    impl HistoryProvider for FakeHistory {
        async fn fetch_transactions(
            &self,
            _address: &str,
            category: TxCategory,
        ) -> Result<Vec<ExplorerTx>, ExplorerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let slot = match category {
                TxCategory::Normal => &self.normal,
                TxCategory::Internal => &self.internal,
            };
            match &*slot.lock().unwrap() {
                Ok(txs) => Ok(txs.clone()),
                Err(msg) => Err(ExplorerError::Request(msg.clone())),
            }
        }
    }

    pub struct FakeAnalysis {
        pub reply: String,
        pub calls: AtomicUsize,
        pub last_record_count: AtomicUsize,
    }

    impl FakeAnalysis {
        pub fn new(reply: impl Into<String>) -> Self {
            Self {
                reply: reply.into(),
                calls: AtomicUsize::new(0),
                last_record_count: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AnalysisProvider for FakeAnalysis {
        async fn analyze_history(
            &self,
            records: &[TransactionRecord],
        ) -> Result<String, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.last_record_count.store(records.len(), Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    /// Explorer record with a given sender and timestamp.
    pub fn explorer_tx(from: &str, time_stamp: u64, value: &str) -> ExplorerTx {
        ExplorerTx {
            from: from.to_string(),
            to: "0xcccccccccccccccccccccccccccccccccccccccc".to_string(),
            value: value.to_string(),
            time_stamp: time_stamp.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use super::fakes::*;
    use super::*;

    const OTHER_ADDRESS: &str = "0x000000000000000000000000000000000000beef";

    fn service(
        chain: Arc<FakeChain>,
        history: Arc<FakeHistory>,
        analysis: Arc<FakeAnalysis>,
    ) -> WalletService {
        WalletService::new(chain, history, analysis)
    }

    fn some_address() -> Address {
        "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12"
            .parse()
            .unwrap()
    }

    #[test]
    fn create_wallet_returns_fresh_key_material() {
        let svc = service(
            Arc::new(FakeChain::new(U256::ZERO, None)),
            Arc::new(FakeHistory::empty()),
            Arc::new(FakeAnalysis::new("")),
        );

        let wallet = svc.create_wallet().unwrap();
        assert_eq!(wallet.address.len(), 42);
        assert_eq!(wallet.mnemonic.split_whitespace().count(), 12);
    }

    #[tokio::test]
    async fn balance_converts_wei_exactly() {
        let raw = U256::from(1_500_000_000_000_000_000u64);
        let svc = service(
            Arc::new(FakeChain::new(raw, None)),
            Arc::new(FakeHistory::empty()),
            Arc::new(FakeAnalysis::new("")),
        );

        let result = svc.get_balance(some_address()).await.unwrap();
        assert_eq!(result.balance, "1.5");
        assert_eq!(result.unit, "MATIC");
    }

    #[tokio::test]
    async fn repeated_balance_lookups_are_identical() {
        let raw = U256::from(7_000_000_000_000_000u64);
        let svc = service(
            Arc::new(FakeChain::new(raw, None)),
            Arc::new(FakeHistory::empty()),
            Arc::new(FakeAnalysis::new("")),
        );

        let first = svc.get_balance(some_address()).await.unwrap();
        let second = svc.get_balance(some_address()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn transfer_without_signer_fails_before_any_submission() {
        let chain = Arc::new(FakeChain::new(U256::ZERO, None));
        let svc = service(
            chain.clone(),
            Arc::new(FakeHistory::empty()),
            Arc::new(FakeAnalysis::new("")),
        );

        let err = svc
            .simulate_transfer(some_address(), U256::from(1u64), "0.000000000000000001")
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::SignerUnconfigured));
        assert_eq!(chain.send_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn underfunded_transfer_is_classified_as_funding_error() {
        let signer = some_address();
        let chain = Arc::new(
            FakeChain::new(U256::ZERO, Some(signer)).failing_with(ChainError::InsufficientFunds),
        );
        let svc = service(
            chain,
            Arc::new(FakeHistory::empty()),
            Arc::new(FakeAnalysis::new("")),
        );

        let err = svc
            .simulate_transfer(some_address(), U256::from(10u64).pow(U256::from(18u64)), "1")
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InsufficientFunds));
    }

    #[tokio::test]
    async fn confirmed_transfer_carries_hash_and_explorer_link() {
        let signer = some_address();
        let chain = Arc::new(FakeChain::new(U256::ZERO, Some(signer)));
        let svc = service(
            chain,
            Arc::new(FakeHistory::empty()),
            Arc::new(FakeAnalysis::new("")),
        );

        let to: Address = OTHER_ADDRESS.parse().unwrap();
        let result = svc
            .simulate_transfer(to, U256::from(10u64).pow(U256::from(18u64)), "1")
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.amount, "1");
        assert_eq!(result.transaction_hash, "0xfeed");
        assert_eq!(
            result.explorer_url,
            "https://amoy.polygonscan.com/tx/0xfeed"
        );
        assert_eq!(result.from, signer.to_checksum(None));
    }

    #[tokio::test]
    async fn history_merges_sorts_and_truncates_to_twenty() {
        // 15 normal + 10 internal records with distinct timestamps.
        let normal: Vec<_> = (0..15)
            .map(|i| explorer_tx(OTHER_ADDRESS, 2_000 + i * 2, "1000000000000000000"))
            .collect();
        let internal: Vec<_> = (0..10)
            .map(|i| explorer_tx(OTHER_ADDRESS, 2_001 + i * 2, "1000000000000000000"))
            .collect();

        let svc = service(
            Arc::new(FakeChain::new(U256::ZERO, None)),
            Arc::new(FakeHistory::new(Ok(normal), Ok(internal))),
            Arc::new(FakeAnalysis::new("")),
        );

        let history = svc.wallet_history(some_address()).await;
        assert_eq!(history.len(), HISTORY_LIMIT);

        // Strictly descending timestamps.
        for pair in history.windows(2) {
            assert!(pair[0].timestamp > pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn one_failed_category_does_not_abort_the_other() {
        let normal = vec![explorer_tx(OTHER_ADDRESS, 1_700_000_000, "5000000000000000000")];
        let svc = service(
            Arc::new(FakeChain::new(U256::ZERO, None)),
            Arc::new(FakeHistory::new(
                Ok(normal),
                Err("explorer is down".to_string()),
            )),
            Arc::new(FakeAnalysis::new("")),
        );

        let history = svc.wallet_history(some_address()).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].value, "5");
    }

    #[tokio::test]
    async fn history_direction_ignores_address_case() {
        let owner = some_address();
        // Explorer reports senders lowercased.
        let sent = explorer_tx(
            &owner.to_checksum(None).to_lowercase(),
            1_700_000_000,
            "1000000000000000000",
        );
        let received = explorer_tx(OTHER_ADDRESS, 1_700_000_001, "2000000000000000000");

        let svc = service(
            Arc::new(FakeChain::new(U256::ZERO, None)),
            Arc::new(FakeHistory::new(Ok(vec![sent, received]), Ok(Vec::new()))),
            Arc::new(FakeAnalysis::new("")),
        );

        let history = svc.wallet_history(owner).await;
        assert_eq!(history[0].kind, "Received");
        assert_eq!(history[1].kind, "Sent");
    }

    #[tokio::test]
    async fn history_timestamps_are_rfc3339_or_sentinel() {
        let dated = explorer_tx(OTHER_ADDRESS, 1_700_000_000, "0");
        let mut undated = explorer_tx(OTHER_ADDRESS, 0, "0");
        undated.time_stamp = String::new();

        let svc = service(
            Arc::new(FakeChain::new(U256::ZERO, None)),
            Arc::new(FakeHistory::new(Ok(vec![dated, undated]), Ok(Vec::new()))),
            Arc::new(FakeAnalysis::new("")),
        );

        let history = svc.wallet_history(some_address()).await;
        assert_eq!(history[0].timestamp, "2023-11-14T22:13:20.000Z");
        assert_eq!(history[1].timestamp, "N/A");
    }

    #[tokio::test]
    async fn analyze_empty_wallet_short_circuits() {
        let analysis = Arc::new(FakeAnalysis::new("should never be seen"));
        let svc = service(
            Arc::new(FakeChain::new(U256::ZERO, None)),
            Arc::new(FakeHistory::empty()),
            analysis.clone(),
        );

        let result = svc.analyze_wallet(some_address()).await.unwrap();
        assert_eq!(result.analysis, EMPTY_HISTORY_ANALYSIS);
        assert_eq!(analysis.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn analyze_passes_capped_history_and_returns_text_verbatim() {
        let normal: Vec<_> = (0..30)
            .map(|i| explorer_tx(OTHER_ADDRESS, 1_000 + i, "1000000000000000000"))
            .collect();

        let analysis = Arc::new(FakeAnalysis::new("An active test wallet."));
        let svc = service(
            Arc::new(FakeChain::new(U256::ZERO, None)),
            Arc::new(FakeHistory::new(Ok(normal), Ok(Vec::new()))),
            analysis.clone(),
        );

        let result = svc.analyze_wallet(some_address()).await.unwrap();
        assert_eq!(result.analysis, "An active test wallet.");
        assert_eq!(analysis.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            analysis.last_record_count.load(Ordering::SeqCst),
            HISTORY_LIMIT
        );
    }
}
