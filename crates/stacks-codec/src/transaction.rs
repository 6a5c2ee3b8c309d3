//! Transaction Wire Format - single-sig standard auth
//!
//! Serializes and signs the two payload kinds the client needs: a contract
//! call (pause/unpause) and a smart-contract deploy. Signing follows the
//! standard sighash chain: hash the transaction with a cleared spending
//! condition, fold in auth type, fee and nonce, then sign with recoverable
//! ECDSA over secp256k1.

use crate::address::{hash160, StacksAddress};
use crate::clarity::ClarityValue;
use crate::network::Network;
use secp256k1::{Message, Secp256k1, SecretKey};
use sha2::{Digest, Sha512_256};
use thiserror::Error;

const AUTH_TYPE_STANDARD: u8 = 0x04;
const HASH_MODE_P2PKH: u8 = 0x00;
const KEY_ENCODING_COMPRESSED: u8 = 0x00;
const PAYLOAD_SMART_CONTRACT: u8 = 0x01;
const PAYLOAD_CONTRACT_CALL: u8 = 0x02;

/// Clarity limits name identifiers to 128 characters
const MAX_NAME_LEN: usize = 128;

/// Codec-level failures
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("identifier '{0}' is empty or longer than {MAX_NAME_LEN} characters")]
    BadIdentifier(String),

    #[error("signing failed: {0}")]
    Signing(#[from] secp256k1::Error),
}

/// When the transaction may be mined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AnchorMode {
    OnChainOnly = 0x01,
    OffChainOnly = 0x02,
    Any = 0x03,
}

/// Post-condition strictness; Allow places no value-transfer constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PostConditionMode {
    Allow = 0x01,
    Deny = 0x02,
}

/// Transaction payload
#[derive(Debug, Clone)]
pub enum Payload {
    /// Call a public function on a deployed contract
    ContractCall {
        contract: StacksAddress,
        contract_name: String,
        function_name: String,
        args: Vec<ClarityValue>,
    },
    /// Deploy contract source under a name
    SmartContract { name: String, code_body: String },
}

/// A transaction ready to sign; the ordering nonce is already resolved
#[derive(Debug, Clone)]
pub struct UnsignedTransaction {
    pub version: u8,
    pub chain_id: u32,
    pub fee: u64,
    pub nonce: u64,
    pub anchor_mode: AnchorMode,
    pub post_condition_mode: PostConditionMode,
    pub payload: Payload,
}

/// Broadcast-ready bytes plus the transaction id they hash to
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    bytes: Vec<u8>,
    txid: String,
}

impl SignedTransaction {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn txid(&self) -> &str {
        &self.txid
    }
}

impl UnsignedTransaction {
    /// Convenience constructor taking version bytes from the network selector
    pub fn for_network(
        network: Network,
        fee: u64,
        nonce: u64,
        post_condition_mode: PostConditionMode,
        anchor_mode: AnchorMode,
        payload: Payload,
    ) -> Self {
        Self {
            version: network.transaction_version(),
            chain_id: network.chain_id(),
            fee,
            nonce,
            anchor_mode,
            post_condition_mode,
            payload,
        }
    }

    /// Sign with a secp256k1 secret key, producing broadcast bytes and txid
    pub fn sign(&self, key: &SecretKey) -> Result<SignedTransaction, CodecError> {
        let secp = Secp256k1::new();
        let public = key.public_key(&secp);
        let signer = hash160(&public.serialize());

        // initial sighash: the transaction with a cleared spending condition
        let mut cleared = Vec::new();
        self.serialize(&signer, 0, 0, &[0u8; 65], &mut cleared)?;
        let initial = sha512_256(&cleared);

        let mut presign_input = Vec::with_capacity(32 + 1 + 8 + 8);
        presign_input.extend_from_slice(&initial);
        presign_input.push(AUTH_TYPE_STANDARD);
        presign_input.extend_from_slice(&self.fee.to_be_bytes());
        presign_input.extend_from_slice(&self.nonce.to_be_bytes());
        let presign = sha512_256(&presign_input);

        let message = Message::from_digest(presign);
        let recoverable = secp.sign_ecdsa_recoverable(&message, key);
        let (recovery_id, rs) = recoverable.serialize_compact();

        let mut signature = [0u8; 65];
        signature[0] = recovery_id.to_i32() as u8;
        signature[1..].copy_from_slice(&rs);

        let mut bytes = Vec::new();
        self.serialize(&signer, self.fee, self.nonce, &signature, &mut bytes)?;
        let txid = hex::encode(sha512_256(&bytes));

        Ok(SignedTransaction { bytes, txid })
    }

    fn serialize(
        &self,
        signer: &[u8; 20],
        fee: u64,
        nonce: u64,
        signature: &[u8; 65],
        out: &mut Vec<u8>,
    ) -> Result<(), CodecError> {
        out.push(self.version);
        out.extend_from_slice(&self.chain_id.to_be_bytes());

        // standard auth, single-sig P2PKH spending condition
        out.push(AUTH_TYPE_STANDARD);
        out.push(HASH_MODE_P2PKH);
        out.extend_from_slice(signer);
        out.extend_from_slice(&nonce.to_be_bytes());
        out.extend_from_slice(&fee.to_be_bytes());
        out.push(KEY_ENCODING_COMPRESSED);
        out.extend_from_slice(signature);

        out.push(self.anchor_mode as u8);
        out.push(self.post_condition_mode as u8);
        // post-condition list is always empty for the breaker operations
        out.extend_from_slice(&0u32.to_be_bytes());

        match &self.payload {
            Payload::ContractCall {
                contract,
                contract_name,
                function_name,
                args,
            } => {
                out.push(PAYLOAD_CONTRACT_CALL);
                out.push(contract.version);
                out.extend_from_slice(&contract.hash160);
                write_name(contract_name, out)?;
                write_name(function_name, out)?;
                out.extend_from_slice(&(args.len() as u32).to_be_bytes());
                for arg in args {
                    arg.serialize(out);
                }
            }
            Payload::SmartContract { name, code_body } => {
                out.push(PAYLOAD_SMART_CONTRACT);
                write_name(name, out)?;
                out.extend_from_slice(&(code_body.len() as u32).to_be_bytes());
                out.extend_from_slice(code_body.as_bytes());
            }
        }
        Ok(())
    }
}

fn write_name(name: &str, out: &mut Vec<u8>) -> Result<(), CodecError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(CodecError::BadIdentifier(name.to_string()));
    }
    out.push(name.len() as u8);
    out.extend_from_slice(name.as_bytes());
    Ok(())
}

fn sha512_256(data: &[u8]) -> [u8; 32] {
    Sha512_256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::ADDRESS_VERSION_TESTNET_SINGLESIG;

    // fixed byte offsets within the serialized single-sig transaction
    const OFF_AUTH_TYPE: usize = 5;
    const OFF_HASH_MODE: usize = 6;
    const OFF_NONCE: usize = 27;
    const OFF_FEE: usize = 35;
    const OFF_ANCHOR: usize = 109;
    const OFF_POSTCOND_MODE: usize = 110;
    const OFF_PAYLOAD: usize = 115;

    fn test_key() -> SecretKey {
        SecretKey::from_slice(&[0x21; 32]).unwrap()
    }

    fn call_tx(fee: u64, nonce: u64) -> UnsignedTransaction {
        UnsignedTransaction::for_network(
            Network::Testnet,
            fee,
            nonce,
            PostConditionMode::Allow,
            AnchorMode::Any,
            Payload::ContractCall {
                contract: StacksAddress {
                    version: ADDRESS_VERSION_TESTNET_SINGLESIG,
                    hash160: [0x5a; 20],
                },
                contract_name: "circuit-breaker".to_string(),
                function_name: "pause".to_string(),
                args: vec![],
            },
        )
    }

    #[test]
    fn contract_call_wire_layout() {
        let signed = call_tx(10_000, 7).sign(&test_key()).unwrap();
        let bytes = signed.bytes();

        assert_eq!(bytes[0], 0x80, "testnet version byte");
        assert_eq!(&bytes[1..5], &0x8000_0000u32.to_be_bytes());
        assert_eq!(bytes[OFF_AUTH_TYPE], 0x04);
        assert_eq!(bytes[OFF_HASH_MODE], 0x00);
        assert_eq!(&bytes[OFF_NONCE..OFF_NONCE + 8], &7u64.to_be_bytes());
        assert_eq!(&bytes[OFF_FEE..OFF_FEE + 8], &10_000u64.to_be_bytes());
        assert_eq!(bytes[OFF_ANCHOR], 0x03);
        assert_eq!(bytes[OFF_POSTCOND_MODE], 0x01);
        assert_eq!(&bytes[111..115], &[0, 0, 0, 0], "empty post-conditions");
        assert_eq!(bytes[OFF_PAYLOAD], 0x02, "contract call payload");

        // payload: address (1 + 20), then length-prefixed names
        let name_off = OFF_PAYLOAD + 1 + 21;
        assert_eq!(bytes[name_off] as usize, "circuit-breaker".len());
        let fn_off = name_off + 1 + "circuit-breaker".len();
        assert_eq!(bytes[fn_off] as usize, "pause".len());
        assert_eq!(&bytes[fn_off + 1..fn_off + 6], b"pause");
        // empty argument vector
        assert_eq!(&bytes[fn_off + 6..fn_off + 10], &[0, 0, 0, 0]);
        assert_eq!(bytes.len(), fn_off + 10);
    }

    #[test]
    fn deploy_wire_layout() {
        let code = "(define-data-var paused bool false)";
        let tx = UnsignedTransaction::for_network(
            Network::Mainnet,
            10_000,
            0,
            PostConditionMode::Allow,
            AnchorMode::Any,
            Payload::SmartContract {
                name: "circuit-breaker".to_string(),
                code_body: code.to_string(),
            },
        );
        let signed = tx.sign(&test_key()).unwrap();
        let bytes = signed.bytes();

        assert_eq!(bytes[0], 0x00, "mainnet version byte");
        assert_eq!(&bytes[1..5], &1u32.to_be_bytes());
        assert_eq!(bytes[OFF_PAYLOAD], 0x01, "smart contract payload");
        assert_eq!(bytes[OFF_PAYLOAD + 1] as usize, "circuit-breaker".len());
        let body_off = OFF_PAYLOAD + 2 + "circuit-breaker".len();
        assert_eq!(
            &bytes[body_off..body_off + 4],
            &(code.len() as u32).to_be_bytes()
        );
        assert_eq!(&bytes[body_off + 4..], code.as_bytes());
    }

    #[test]
    fn signing_is_deterministic() {
        let a = call_tx(10_000, 3).sign(&test_key()).unwrap();
        let b = call_tx(10_000, 3).sign(&test_key()).unwrap();
        assert_eq!(a.bytes(), b.bytes());
        assert_eq!(a.txid(), b.txid());
        assert_eq!(a.txid().len(), 64, "txid is 32 bytes hex");
    }

    #[test]
    fn fee_and_nonce_bind_the_signature() {
        let base = call_tx(10_000, 3).sign(&test_key()).unwrap();
        let fee_changed = call_tx(20_000, 3).sign(&test_key()).unwrap();
        let nonce_changed = call_tx(10_000, 4).sign(&test_key()).unwrap();

        assert_ne!(base.txid(), fee_changed.txid());
        assert_ne!(base.txid(), nonce_changed.txid());
        // signatures must differ, not just the serialized fee field
        assert_ne!(base.bytes()[44..109], fee_changed.bytes()[44..109]);
        assert_ne!(base.bytes()[44..109], nonce_changed.bytes()[44..109]);
    }

    #[test]
    fn rejects_oversized_identifiers() {
        let mut tx = call_tx(10_000, 0);
        if let Payload::ContractCall { function_name, .. } = &mut tx.payload {
            *function_name = "f".repeat(129);
        }
        assert!(matches!(
            tx.sign(&test_key()),
            Err(CodecError::BadIdentifier(_))
        ));
    }
}
