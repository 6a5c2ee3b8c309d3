//! API Types - request addressing and response envelopes

use serde::Deserialize;
use stacks_codec::{AddressError, StacksAddress};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Contract identifier errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractIdError {
    #[error("expected OWNER.contract-name, missing '.'")]
    MissingSeparator,

    #[error("bad owner address: {0}")]
    BadOwner(#[from] AddressError),

    #[error("bad contract name '{0}'")]
    BadName(String),
}

/// Fully-qualified contract reference: owner address plus contract name.
/// Parsed once from configuration and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractId {
    owner: StacksAddress,
    name: String,
}

impl ContractId {
    pub fn new(owner: StacksAddress, name: impl Into<String>) -> Result<Self, ContractIdError> {
        let name = name.into();
        if name.is_empty()
            || name.len() > 128
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ContractIdError::BadName(name));
        }
        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &StacksAddress {
        &self.owner
    }

    /// Owner address in c32 string form, as used in API paths
    pub fn owner_c32(&self) -> String {
        self.owner.encode()
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

impl FromStr for ContractId {
    type Err = ContractIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s.split_once('.').ok_or(ContractIdError::MissingSeparator)?;
        Self::new(StacksAddress::decode(owner)?, name)
    }
}

/// Response of `/v2/contracts/call-read`; `result.repr` carries the textual
/// rendering of the returned Clarity value
#[derive(Debug, Clone, Deserialize)]
pub struct CallReadResult {
    #[serde(default)]
    pub result: Option<ValueEnvelope>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValueEnvelope {
    #[serde(default)]
    pub repr: Option<String>,
}

impl CallReadResult {
    /// The repr string, if the node returned one
    pub fn repr(&self) -> Option<&str> {
        self.result.as_ref().and_then(|v| v.repr.as_deref())
    }
}

/// Account state subset used for nonce resolution
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    pub nonce: u64,
}

/// Broadcast outcome: either an accepted txid or a structured rejection
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BroadcastResponse {
    Accepted {
        txid: String,
    },
    Rejected {
        error: String,
        #[serde(default)]
        reason: Option<String>,
    },
}
