//! Switch State and Commands

use serde::{Deserialize, Serialize};
use std::fmt;

/// The remote circuit-breaker flag as last observed.
///
/// `Unknown` is the value before any successful read. Only a successful
/// [`crate::reader::StateReader`] query mutates this; a submission merely
/// requests a future transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwitchState {
    #[default]
    Unknown,
    Active,
    Paused,
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SwitchState::Unknown => "unknown",
            SwitchState::Active => "active",
            SwitchState::Paused => "paused",
        };
        f.write_str(s)
    }
}

/// The two state-changing operations the contract exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerFunction {
    Pause,
    Unpause,
}

impl BreakerFunction {
    /// Function name as deployed on chain
    pub fn wire_name(&self) -> &'static str {
        match self {
            BreakerFunction::Pause => "pause",
            BreakerFunction::Unpause => "unpause",
        }
    }

    /// The switch state a confirmed execution must produce
    pub fn expected_state(&self) -> SwitchState {
        match self {
            BreakerFunction::Pause => SwitchState::Paused,
            BreakerFunction::Unpause => SwitchState::Active,
        }
    }
}

impl fmt::Display for BreakerFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_unknown() {
        assert_eq!(SwitchState::default(), SwitchState::Unknown);
    }

    #[test]
    fn expected_states_are_symmetric() {
        assert_eq!(BreakerFunction::Pause.expected_state(), SwitchState::Paused);
        assert_eq!(
            BreakerFunction::Unpause.expected_state(),
            SwitchState::Active
        );
    }
}
