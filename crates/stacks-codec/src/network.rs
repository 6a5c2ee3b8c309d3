//! Network Selector - testnet/mainnet constants
//!
//! Couples the API base URL with the chain id and version bytes, the same
//! pairing the node API expects.

use crate::address::{ADDRESS_VERSION_MAINNET_SINGLESIG, ADDRESS_VERSION_TESTNET_SINGLESIG};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which Stacks network the client is talking to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown network '{0}', expected 'testnet' or 'mainnet'")]
pub struct UnknownNetwork(String);

impl Network {
    /// Base URL of the hosted node API
    pub fn api_base(&self) -> &'static str {
        match self {
            Network::Testnet => "https://api.testnet.hiro.so",
            Network::Mainnet => "https://api.hiro.so",
        }
    }

    /// Chain id carried in every transaction
    pub fn chain_id(&self) -> u32 {
        match self {
            Network::Testnet => 0x8000_0000,
            Network::Mainnet => 0x0000_0001,
        }
    }

    /// Transaction version byte
    pub fn transaction_version(&self) -> u8 {
        match self {
            Network::Testnet => 0x80,
            Network::Mainnet => 0x00,
        }
    }

    /// Single-sig address version for this network
    pub fn address_version(&self) -> u8 {
        match self {
            Network::Testnet => ADDRESS_VERSION_TESTNET_SINGLESIG,
            Network::Mainnet => ADDRESS_VERSION_MAINNET_SINGLESIG,
        }
    }

    /// Explorer link for a transaction id
    pub fn explorer_txid_url(&self, txid: &str) -> String {
        format!(
            "https://explorer.stacks.co/txid/{}?chain={}",
            txid,
            self.name()
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            other => Err(UnknownNetwork(other.to_string())),
        }
    }
}
