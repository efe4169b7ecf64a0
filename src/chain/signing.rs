// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Amoy Wallet Contributors

//! Key material handling: fresh wallet generation and signer construction
//! from the configured server key. Generated keys are returned to the
//! caller and never retained.

use alloy::signers::local::{
    coins_bip39::{English, Mnemonic},
    MnemonicBuilder, PrivateKeySigner,
};
use rand::thread_rng;

use super::types::ChainError;

/// Number of words in generated recovery phrases.
const MNEMONIC_WORDS: usize = 12;

/// A freshly generated keypair with its recovery phrase.
#[derive(Debug, Clone)]
pub struct GeneratedWallet {
    /// EIP-55 checksummed address.
    pub address: String,
    /// Hex private key, `0x`-prefixed.
    pub private_key: String,
    /// BIP-39 recovery phrase.
    pub mnemonic: String,
}

/// Generate a new random wallet.
///
/// Entropy comes from the OS RNG. The derived signer uses the standard
/// Ethereum derivation path.
pub fn generate_wallet() -> Result<GeneratedWallet, ChainError> {
    let mut rng = thread_rng();

    let mnemonic = Mnemonic::<English>::new_with_count(&mut rng, MNEMONIC_WORDS)
        .map_err(|e| ChainError::KeyGeneration(e.to_string()))?;
    let phrase = mnemonic.to_phrase();

    let signer = MnemonicBuilder::<English>::default()
        .phrase(phrase.as_str())
        .build()
        .map_err(|e| ChainError::KeyGeneration(e.to_string()))?;

    Ok(GeneratedWallet {
        address: signer.address().to_checksum(None),
        private_key: format!("0x{}", alloy::hex::encode(signer.to_bytes())),
        mnemonic: phrase,
    })
}

/// Create a signer from a hex private key, with or without `0x` prefix.
pub fn signer_from_hex(private_key_hex: &str) -> Result<PrivateKeySigner, ChainError> {
    let stripped = private_key_hex
        .trim()
        .strip_prefix("0x")
        .unwrap_or_else(|| private_key_hex.trim());

    let key_bytes = alloy::hex::decode(stripped)
        .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))?;

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))
}
