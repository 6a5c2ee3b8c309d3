//! Stacks Codec - Address and transaction wire encoding
//!
//! Minimal single-signer subset of the Stacks wire format:
//! - c32check address encoding/decoding
//! - Clarity value serialization (booleans only; breaker calls take no args)
//! - Standard-auth transaction serialization and recoverable ECDSA signing

pub mod address;
pub mod clarity;
pub mod network;
pub mod transaction;

pub use address::{AddressError, StacksAddress};
pub use clarity::ClarityValue;
pub use network::Network;
pub use transaction::{
    AnchorMode, CodecError, Payload, PostConditionMode, SignedTransaction, UnsignedTransaction,
};
