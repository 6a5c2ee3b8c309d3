//! Console Configuration
//!
//! Contract reference and signing key come from flags or environment.
//! Mnemonic-to-key derivation happens outside this tool; a mnemonic in the
//! environment is only shape-checked so the operator gets a clear message.

use anyhow::{bail, Context, Result};
use breaker_core::keys;
use secp256k1::SecretKey;
use stacks_api::ContractId;

pub const CONTRACT_ENV: &str = "FORTIFIER_CONTRACT";
pub const PRIVATE_KEY_ENV: &str = "FORTIFIER_PRIVATE_KEY";
pub const MNEMONIC_ENV: &str = "FORTIFIER_MNEMONIC";

const DEFAULT_CONTRACT: &str = "ST2QNSNKR3NRDWNTX0Q7R4T8WGBJ8RE8RA7GKS7WN.circuit-breaker";

/// Contract reference from `--contract`, the environment, or the default
pub fn resolve_contract(flag: Option<&str>) -> Result<ContractId> {
    let raw = match flag {
        Some(s) => s.to_string(),
        None => std::env::var(CONTRACT_ENV).unwrap_or_else(|_| DEFAULT_CONTRACT.to_string()),
    };
    raw.parse()
        .with_context(|| format!("invalid contract reference '{}'", raw))
}

/// Signing key from the environment
pub fn load_secret_key() -> Result<SecretKey> {
    if let Ok(hexkey) = std::env::var(PRIVATE_KEY_ENV) {
        return keys::parse_secret_key(&hexkey)
            .with_context(|| format!("{} is not a usable private key", PRIVATE_KEY_ENV));
    }
    if let Ok(mnemonic) = std::env::var(MNEMONIC_ENV) {
        keys::validate_mnemonic_shape(&mnemonic)?;
        bail!(
            "{} holds a valid mnemonic, but key derivation happens outside this tool; \
             export the derived private key via {}",
            MNEMONIC_ENV,
            PRIVATE_KEY_ENV
        );
    }
    bail!(
        "{} not set; state-changing commands need a signing key",
        PRIVATE_KEY_ENV
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_contract_flag_wins() {
        use stacks_codec::address::ADDRESS_VERSION_TESTNET_SINGLESIG;
        use stacks_codec::StacksAddress;

        let owner = StacksAddress {
            version: ADDRESS_VERSION_TESTNET_SINGLESIG,
            hash160: [9; 20],
        };
        let id = resolve_contract(Some(&format!("{}.other", owner))).unwrap();
        assert_eq!(id.name(), "other");
        assert!(resolve_contract(Some("garbage")).is_err());
    }
}
