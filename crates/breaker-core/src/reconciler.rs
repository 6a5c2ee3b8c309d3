//! Reconciler - bounded post-submission confirmation polling
//!
//! A successful broadcast proves nothing about effect. The reconciler waits
//! out typical confirmation latency, re-reads, and resolves the request to
//! `Confirmed` only on a matching fresh read. Polling is bounded: after the
//! configured rechecks it resolves `Unconfirmed` instead of silently looping
//! over a transaction that may never land.

use crate::pending::{PendingRequest, RequestPhase};
use crate::reader::StateReader;
use crate::state::SwitchState;
use stacks_api::NodeClient;
use std::time::Duration;

/// Delay and retry schedule for confirmation polling.
///
/// The chain's block cadence is roughly periodic, so a fixed delay is used
/// rather than exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait before the first read, sized to exceed typical confirmation latency
    pub initial_delay: Duration,
    /// Spacing between bounded rechecks
    pub recheck_delay: Duration,
    /// Rechecks after the first read; 0 means a single read decides
    pub max_rechecks: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            recheck_delay: Duration::from_secs(5),
            max_rechecks: 1,
        }
    }
}

/// Terminal resolution of one reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// A fresh read matched the expected post-state
    Confirmed,
    /// Bounded effort exhausted; the operator must refresh manually
    Unconfirmed,
}

/// Resolves pending requests against fresh reads
pub struct Reconciler<C> {
    reader: StateReader<C>,
    policy: PollPolicy,
}

impl<C: NodeClient> Reconciler<C> {
    pub fn new(reader: StateReader<C>, policy: PollPolicy) -> Self {
        Self { reader, policy }
    }

    /// Poll until the remote state matches `expected` or effort is exhausted,
    /// moving `pending` to its terminal phase.
    pub async fn reconcile(
        &self,
        pending: &mut PendingRequest,
        expected: SwitchState,
    ) -> ReconcileOutcome {
        tokio::time::sleep(self.policy.initial_delay).await;
        if self.reader.read_state().await == expected {
            return self.confirm(pending, expected);
        }

        for recheck in 1..=self.policy.max_rechecks {
            tracing::debug!(
                "state not yet {}, recheck {}/{}",
                expected,
                recheck,
                self.policy.max_rechecks
            );
            tokio::time::sleep(self.policy.recheck_delay).await;
            if self.reader.read_state().await == expected {
                return self.confirm(pending, expected);
            }
        }

        pending.phase = RequestPhase::Unconfirmed;
        tracing::warn!(
            "gave up waiting for {} confirmation (txid {:?}); check manually",
            pending.function,
            pending.txid
        );
        ReconcileOutcome::Unconfirmed
    }

    fn confirm(&self, pending: &mut PendingRequest, expected: SwitchState) -> ReconcileOutcome {
        pending.phase = RequestPhase::Confirmed;
        tracing::info!("{} confirmed: switch is now {}", pending.function, expected);
        ReconcileOutcome::Confirmed
    }
}
