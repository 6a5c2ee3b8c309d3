//! Key Material - parsing and shape checks
//!
//! Only parsing lives here. Mnemonic-to-key derivation is an external
//! collaborator's job; phrases are shape-checked so misconfiguration
//! surfaces as a clear message instead of a signing failure.

use secp256k1::SecretKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("private key must be hex: {0}")]
    NotHex(#[from] hex::FromHexError),

    #[error("invalid secp256k1 private key: {0}")]
    Invalid(#[from] secp256k1::Error),

    #[error("mnemonic must be 12 or 24 BIP-39 words, got {0}")]
    BadMnemonicLength(usize),
}

/// Parse a hex private key, tolerating the trailing compression marker
/// that wallet exports append
pub fn parse_secret_key(hexkey: &str) -> Result<SecretKey, KeyError> {
    let hexkey = hexkey.trim();
    let trimmed = if hexkey.len() == 66 && hexkey.ends_with("01") {
        &hexkey[..64]
    } else {
        hexkey
    };
    let bytes = hex::decode(trimmed)?;
    Ok(SecretKey::from_slice(&bytes)?)
}

/// Accept only 12- or 24-word BIP-39 phrases
pub fn validate_mnemonic_shape(mnemonic: &str) -> Result<(), KeyError> {
    let cleaned = mnemonic.trim().trim_matches(&['"', '\''][..]);
    let words = cleaned.split_whitespace().count();
    if words == 12 || words == 24 {
        Ok(())
    } else {
        Err(KeyError::BadMnemonicLength(words))
    }
}
