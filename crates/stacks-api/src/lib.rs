//! Stacks API - client for the hosted node RPC
//!
//! The client side of the node's JSON-over-HTTP API:
//! - read-only contract calls
//! - account nonce lookups
//! - signed transaction broadcast
//!
//! All operations return explicit outcome values; nothing in here panics on
//! a bad response.

pub mod client;
pub mod error;
pub mod types;

pub use client::{HttpNodeClient, NodeClient};
pub use error::ApiError;
pub use types::{BroadcastResponse, CallReadResult, ContractId, ContractIdError, ValueEnvelope};
