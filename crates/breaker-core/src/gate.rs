//! Command Gate - guard against duplicate and misdirected commands
//!
//! The only concurrency-safety mechanism in the system: there is no
//! server-side idempotency key, so this client-side check is the sole line
//! of defense against double-submission. Reads are not gated; they are
//! idempotent and may run concurrently with an in-flight submission.

use crate::pending::PendingRequest;
use crate::session::Session;
use crate::state::{BreakerFunction, SwitchState};
use thiserror::Error;

/// Why a command was refused before reaching the submitter
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GateRefusal {
    #[error("no authenticated session; connect a wallet first")]
    NotAuthenticated,

    #[error("switch state is unknown; refresh before issuing commands")]
    StateUnknown,

    #[error("switch is already paused")]
    AlreadyPaused,

    #[error("switch is already active")]
    AlreadyActive,

    #[error("another request is already in flight")]
    RequestInFlight,
}

/// Decide whether `function` may be issued right now.
///
/// Refuses when a request is in flight, the session is unauthenticated, the
/// state is unknown, or the switch is already in the requested state.
pub fn check(
    function: BreakerFunction,
    state: SwitchState,
    session: &Session,
    pending: Option<&PendingRequest>,
) -> Result<(), GateRefusal> {
    if pending.is_some_and(PendingRequest::in_flight) {
        return Err(GateRefusal::RequestInFlight);
    }
    if !session.is_authenticated() {
        return Err(GateRefusal::NotAuthenticated);
    }
    match (function, state) {
        (_, SwitchState::Unknown) => Err(GateRefusal::StateUnknown),
        (BreakerFunction::Pause, SwitchState::Paused) => Err(GateRefusal::AlreadyPaused),
        (BreakerFunction::Unpause, SwitchState::Active) => Err(GateRefusal::AlreadyActive),
        _ => Ok(()),
    }
}
