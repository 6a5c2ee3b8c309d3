//! Pending Request - one in-flight state-changing attempt
//!
//! A record only exists once a broadcast was accepted; build and submission
//! failures surface as errors without ever producing one. Lifecycle:
//!
//! ```text
//! AwaitingConfirmation -> Confirmed     [terminal]
//!                      \-> Unconfirmed  [terminal]
//! Failed                                [terminal]
//! ```
//!
//! Not persisted across process restarts.

use crate::state::BreakerFunction;
use chrono::{DateTime, Utc};

/// Where a request sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    AwaitingConfirmation,
    /// A fresh read matched the expected post-state
    Confirmed,
    /// Submission itself failed; nothing is on chain
    Failed,
    /// Bounded rechecks exhausted; outcome ambiguous, operator must refresh
    Unconfirmed,
}

impl RequestPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestPhase::Confirmed | RequestPhase::Failed | RequestPhase::Unconfirmed
        )
    }
}

/// Client-side record of one submission attempt
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub function: BreakerFunction,
    pub submitted_at: DateTime<Utc>,
    /// Assigned by the network on acceptance; absent if submission failed
    pub txid: Option<String>,
    pub phase: RequestPhase,
}

impl PendingRequest {
    /// Record for an accepted broadcast, now awaiting confirmation
    pub fn submitted(function: BreakerFunction, txid: String) -> Self {
        Self {
            function,
            submitted_at: Utc::now(),
            txid: Some(txid),
            phase: RequestPhase::AwaitingConfirmation,
        }
    }

    /// True while the gate must block further state-changing commands
    pub fn in_flight(&self) -> bool {
        !self.phase.is_terminal()
    }
}
