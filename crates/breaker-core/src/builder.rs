//! Transaction Builder - assembles a signable contract-call request
//!
//! Composes contract reference, function name, empty argument list, a fixed
//! fee and the permissive post-condition mode. The ordering nonce is NOT
//! assigned here; the submitter resolves it at sign time so building and
//! signing share a coherent fence.

use crate::session::Session;
use crate::state::BreakerFunction;
use stacks_api::ContractId;
use stacks_codec::{AnchorMode, ClarityValue, Network, PostConditionMode};
use thiserror::Error;

/// Static fee policy; the fee is deliberately not estimated dynamically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
    pub fee_microstx: u64,
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self {
            fee_microstx: 10_000,
        }
    }
}

/// Build-time failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("no authenticated session; reconnect before submitting")]
    NotAuthenticated,
}

/// A contract call ready for nonce assignment and signing
#[derive(Debug, Clone)]
pub struct SignableRequest {
    pub contract: ContractId,
    pub function: BreakerFunction,
    pub args: Vec<ClarityValue>,
    pub fee: u64,
    pub anchor_mode: AnchorMode,
    pub post_condition_mode: PostConditionMode,
    pub network: Network,
}

/// Assemble a signable request for `function` under `session`.
///
/// Post-conditions use the least restrictive mode: the only effect is a
/// state flag, not a value transfer, so any balance change is acceptable.
pub fn build(
    function: BreakerFunction,
    session: &Session,
    contract: &ContractId,
    fee_policy: &FeePolicy,
) -> Result<SignableRequest, BuildError> {
    if !session.is_authenticated() {
        return Err(BuildError::NotAuthenticated);
    }
    Ok(SignableRequest {
        contract: contract.clone(),
        function,
        args: Vec::new(),
        fee: fee_policy.fee_microstx,
        anchor_mode: AnchorMode::Any,
        post_condition_mode: PostConditionMode::Allow,
        network: session.network(),
    })
}
