//! Breaker Core - transaction submission and state reconciliation
//!
//! Turns an operator's intent (pause/unpause) into an authenticated,
//! fee-paying, uniquely-ordered request against the chain, then reconciles
//! the locally-displayed switch state with eventually-consistent remote
//! confirmation. Components, leaves first:
//!
//! - [`reader::StateReader`] - side-effect-free switch state queries
//! - [`session::Session`] - the caller's authenticated identity
//! - [`builder`] - assembles a signable contract-call request
//! - [`submitter`] - signs and broadcasts, direct or delegated
//! - [`reconciler::Reconciler`] - bounded post-submission confirmation polling
//! - [`gate`] - the sole defense against duplicate submission

pub mod builder;
pub mod gate;
pub mod keys;
pub mod pending;
pub mod reader;
pub mod reconciler;
pub mod session;
pub mod state;
pub mod submitter;

pub use builder::{build, BuildError, FeePolicy, SignableRequest};
pub use gate::GateRefusal;
pub use pending::{PendingRequest, RequestPhase};
pub use reader::{ReadOutcome, StateReader};
pub use reconciler::{PollPolicy, ReconcileOutcome, Reconciler};
pub use session::Session;
pub use state::{BreakerFunction, SwitchState};
pub use submitter::{
    DelegatedSubmitter, DirectSubmitter, SubmissionError, Submitter, WalletBridge, WalletOutcome,
};
