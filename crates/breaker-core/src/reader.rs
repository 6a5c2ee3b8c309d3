//! State Reader - side-effect-free switch state queries
//!
//! Safe to call opportunistically and repeatedly: a transport failure or
//! malformed payload maps to `Unknown` and is logged, never propagated.

use crate::state::SwitchState;
use stacks_api::{ContractId, NodeClient};
use std::sync::Arc;

/// Read-only function exposed by the breaker contract
pub const READ_FUNCTION: &str = "is-paused";

/// Result of one read: the interpreted state plus the raw repr it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOutcome {
    pub state: SwitchState,
    pub raw: Option<String>,
}

/// Polls the contract's `is-paused` read endpoint
pub struct StateReader<C> {
    client: Arc<C>,
    contract: ContractId,
}

impl<C> Clone for StateReader<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            contract: self.contract.clone(),
        }
    }
}

impl<C: NodeClient> StateReader<C> {
    pub fn new(client: Arc<C>, contract: ContractId) -> Self {
        Self { client, contract }
    }

    /// Read the current switch state.
    ///
    /// Only the literal repr `"true"` means paused; any other value,
    /// including an absent result, means active. Failures yield `Unknown`.
    pub async fn read(&self) -> ReadOutcome {
        match self.client.call_read_only(&self.contract, READ_FUNCTION).await {
            Ok(result) => {
                let raw = result.repr().map(str::to_string);
                let state = if raw.as_deref() == Some("true") {
                    SwitchState::Paused
                } else {
                    SwitchState::Active
                };
                tracing::debug!("switch state read: {} (repr {:?})", state, raw);
                ReadOutcome { state, raw }
            }
            Err(e) => {
                tracing::warn!("switch state read failed: {}", e);
                ReadOutcome {
                    state: SwitchState::Unknown,
                    raw: None,
                }
            }
        }
    }

    /// Convenience wrapper discarding the raw repr
    pub async fn read_state(&self) -> SwitchState {
        self.read().await.state
    }
}
