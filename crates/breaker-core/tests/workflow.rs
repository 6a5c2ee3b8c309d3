//! Workflow Integration Tests
//!
//! Drives reader, gate, builder, submitter and reconciler together against
//! a scripted in-memory node, the way the operator console does.

use async_trait::async_trait;
use breaker_core::builder::SignableRequest;
use breaker_core::{
    build, gate, BreakerFunction, DelegatedSubmitter, DirectSubmitter, FeePolicy, PendingRequest,
    PollPolicy, ReconcileOutcome, Reconciler, RequestPhase, Session, StateReader, SubmissionError,
    Submitter, SwitchState, WalletBridge, WalletOutcome,
};
use secp256k1::SecretKey;
use stacks_api::{ApiError, CallReadResult, ContractId, NodeClient, ValueEnvelope};
use stacks_codec::address::ADDRESS_VERSION_TESTNET_SINGLESIG;
use stacks_codec::{Network, StacksAddress};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted answer to a read-only call
#[derive(Debug, Clone, Copy)]
enum ReadStep {
    Repr(&'static str),
    Empty,
    ServerError,
}

#[derive(Debug, Clone)]
enum BroadcastStep {
    Accept(&'static str),
    Reject(&'static str, Option<&'static str>),
}

/// In-memory node with scripted responses and call counters
struct FakeNode {
    reads: Mutex<VecDeque<ReadStep>>,
    broadcast: BroadcastStep,
    nonce: u64,
    read_calls: AtomicUsize,
    broadcast_calls: AtomicUsize,
}

impl FakeNode {
    fn new(reads: Vec<ReadStep>, broadcast: BroadcastStep) -> Arc<Self> {
        Arc::new(Self {
            reads: Mutex::new(reads.into()),
            broadcast,
            nonce: 9,
            read_calls: AtomicUsize::new(0),
            broadcast_calls: AtomicUsize::new(0),
        })
    }

    fn read_calls(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    fn broadcast_calls(&self) -> usize {
        self.broadcast_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeClient for FakeNode {
    async fn call_read_only(
        &self,
        _contract: &ContractId,
        _function: &str,
    ) -> Result<CallReadResult, ApiError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .reads
            .lock()
            .unwrap()
            .pop_front()
            .expect("read script exhausted");
        match step {
            ReadStep::Repr(repr) => Ok(CallReadResult {
                result: Some(ValueEnvelope {
                    repr: Some(repr.to_string()),
                }),
            }),
            ReadStep::Empty => Ok(CallReadResult { result: None }),
            ReadStep::ServerError => Err(ApiError::Status {
                status: 500,
                body: "internal error".to_string(),
            }),
        }
    }

    async fn account_nonce(&self, _address: &str) -> Result<u64, ApiError> {
        Ok(self.nonce)
    }

    async fn broadcast(&self, _tx: &[u8]) -> Result<String, ApiError> {
        self.broadcast_calls.fetch_add(1, Ordering::SeqCst);
        match &self.broadcast {
            BroadcastStep::Accept(txid) => Ok(txid.to_string()),
            BroadcastStep::Reject(error, reason) => Err(ApiError::Rejected {
                error: error.to_string(),
                reason: reason.map(str::to_string),
            }),
        }
    }
}

fn contract() -> ContractId {
    let owner = StacksAddress {
        version: ADDRESS_VERSION_TESTNET_SINGLESIG,
        hash160: [0x5a; 20],
    };
    ContractId::new(owner, "circuit-breaker").unwrap()
}

fn session() -> Session {
    let address = StacksAddress {
        version: ADDRESS_VERSION_TESTNET_SINGLESIG,
        hash160: [0x01; 20],
    };
    Session::connect(address, Network::Testnet)
}

fn operator_key() -> SecretKey {
    SecretKey::from_slice(&[0x42; 32]).unwrap()
}

fn fast_policy(max_rechecks: u32) -> PollPolicy {
    PollPolicy {
        initial_delay: Duration::from_millis(10),
        recheck_delay: Duration::from_millis(10),
        max_rechecks,
    }
}

fn pause_request() -> SignableRequest {
    build(
        BreakerFunction::Pause,
        &session(),
        &contract(),
        &FeePolicy::default(),
    )
    .unwrap()
}

// ============================================================================
// State Reader
// ============================================================================

#[tokio::test]
async fn reader_maps_repr_literally() {
    let node = FakeNode::new(
        vec![
            ReadStep::Repr("true"),
            ReadStep::Repr("false"),
            ReadStep::Repr("(ok true)"),
            ReadStep::Empty,
        ],
        BroadcastStep::Accept("t0"),
    );
    let reader = StateReader::new(node.clone(), contract());

    // only the exact literal "true" means paused
    assert_eq!(reader.read_state().await, SwitchState::Paused);
    assert_eq!(reader.read_state().await, SwitchState::Active);
    assert_eq!(reader.read_state().await, SwitchState::Active);
    assert_eq!(reader.read_state().await, SwitchState::Active);
}

#[tokio::test]
async fn reader_turns_server_failure_into_unknown() {
    let node = FakeNode::new(vec![ReadStep::ServerError], BroadcastStep::Accept("t0"));
    let reader = StateReader::new(node.clone(), contract());

    let outcome = reader.read().await;
    assert_eq!(outcome.state, SwitchState::Unknown);
    assert_eq!(outcome.raw, None);
}

#[tokio::test]
async fn consecutive_reads_of_unchanged_state_agree() {
    let node = FakeNode::new(
        vec![ReadStep::Repr("false"), ReadStep::Repr("false")],
        BroadcastStep::Accept("t0"),
    );
    let reader = StateReader::new(node.clone(), contract());

    let first = reader.read().await;
    let second = reader.read().await;
    assert_eq!(first, second);
}

// ============================================================================
// Submitter
// ============================================================================

#[tokio::test]
async fn direct_submission_produces_awaiting_request() {
    let node = FakeNode::new(vec![], BroadcastStep::Accept("txid-1"));
    let submitter = DirectSubmitter::new(node.clone(), operator_key(), Network::Testnet);

    let pending = submitter.submit(&pause_request()).await.unwrap();
    assert_eq!(pending.function, BreakerFunction::Pause);
    assert_eq!(pending.txid.as_deref(), Some("txid-1"));
    assert_eq!(pending.phase, RequestPhase::AwaitingConfirmation);
    assert_eq!(node.broadcast_calls(), 1);
}

#[tokio::test]
async fn rejected_broadcast_yields_no_pending_request() {
    let node = FakeNode::new(
        vec![],
        BroadcastStep::Reject("transaction rejected", Some("BadNonce")),
    );
    let submitter = DirectSubmitter::new(node.clone(), operator_key(), Network::Testnet);

    let err = submitter.submit(&pause_request()).await.unwrap_err();
    match err {
        SubmissionError::Rejected { error, reason } => {
            assert_eq!(error, "transaction rejected");
            assert_eq!(reason.as_deref(), Some("BadNonce"));
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
    // no reconciliation read may follow a failed submission
    assert_eq!(node.read_calls(), 0);
}

struct FakeWallet {
    outcome: WalletOutcome,
    calls: AtomicUsize,
}

#[async_trait]
impl WalletBridge for FakeWallet {
    async fn request_contract_call(
        &self,
        _request: &SignableRequest,
    ) -> Result<WalletOutcome, SubmissionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome.clone())
    }
}

#[tokio::test]
async fn delegated_submission_uses_wallet_txid() {
    let wallet = Arc::new(FakeWallet {
        outcome: WalletOutcome::Submitted {
            txid: "wallet-tx".to_string(),
        },
        calls: AtomicUsize::new(0),
    });
    let submitter = DelegatedSubmitter::new(wallet.clone());

    let pending = submitter.submit(&pause_request()).await.unwrap();
    assert_eq!(pending.txid.as_deref(), Some("wallet-tx"));
    assert_eq!(wallet.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn delegated_cancellation_is_user_cancelled() {
    let wallet = Arc::new(FakeWallet {
        outcome: WalletOutcome::Cancelled,
        calls: AtomicUsize::new(0),
    });
    let submitter = DelegatedSubmitter::new(wallet);

    let err = submitter.submit(&pause_request()).await.unwrap_err();
    assert!(matches!(err, SubmissionError::UserCancelled));
}

// ============================================================================
// Reconciler
// ============================================================================

#[tokio::test(start_paused = true)]
async fn matching_read_confirms_exactly_once() {
    let node = FakeNode::new(vec![ReadStep::Repr("true")], BroadcastStep::Accept("t0"));
    let reader = StateReader::new(node.clone(), contract());
    let reconciler = Reconciler::new(reader, fast_policy(1));

    let mut pending = PendingRequest::submitted(BreakerFunction::Pause, "t0".into());
    let outcome = reconciler
        .reconcile(&mut pending, SwitchState::Paused)
        .await;

    assert_eq!(outcome, ReconcileOutcome::Confirmed);
    assert_eq!(pending.phase, RequestPhase::Confirmed);
    assert!(!pending.in_flight());
    assert_eq!(node.read_calls(), 1, "no reads after confirmation");
}

#[tokio::test(start_paused = true)]
async fn bounded_recheck_exhaustion_is_unconfirmed() {
    // pause submitted, but the chain still reports active on both reads
    let node = FakeNode::new(
        vec![ReadStep::Repr("false"), ReadStep::Repr("false")],
        BroadcastStep::Accept("t0"),
    );
    let reader = StateReader::new(node.clone(), contract());
    let reconciler = Reconciler::new(reader, fast_policy(1));

    let mut pending = PendingRequest::submitted(BreakerFunction::Pause, "t0".into());
    let outcome = reconciler
        .reconcile(&mut pending, SwitchState::Paused)
        .await;

    assert_eq!(outcome, ReconcileOutcome::Unconfirmed);
    assert_eq!(pending.phase, RequestPhase::Unconfirmed);
    assert_eq!(node.read_calls(), 2, "exactly one retry after the first read");
}

#[tokio::test(start_paused = true)]
async fn recheck_can_recover_after_initial_mismatch() {
    let node = FakeNode::new(
        vec![ReadStep::Repr("false"), ReadStep::Repr("true")],
        BroadcastStep::Accept("t0"),
    );
    let reader = StateReader::new(node.clone(), contract());
    let reconciler = Reconciler::new(reader, fast_policy(1));

    let mut pending = PendingRequest::submitted(BreakerFunction::Pause, "t0".into());
    let outcome = reconciler
        .reconcile(&mut pending, SwitchState::Paused)
        .await;

    assert_eq!(outcome, ReconcileOutcome::Confirmed);
    assert_eq!(node.read_calls(), 2);
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test(start_paused = true)]
async fn pause_workflow_end_to_end() {
    let node = FakeNode::new(
        vec![ReadStep::Repr("false"), ReadStep::Repr("true")],
        BroadcastStep::Accept("txid-e2e"),
    );
    let reader = StateReader::new(node.clone(), contract());
    let session = session();

    // read, gate, build, submit, reconcile
    let current = reader.read_state().await;
    assert_eq!(current, SwitchState::Active);
    gate::check(BreakerFunction::Pause, current, &session, None).unwrap();

    let request = build(
        BreakerFunction::Pause,
        &session,
        &contract(),
        &FeePolicy::default(),
    )
    .unwrap();
    let submitter = DirectSubmitter::new(node.clone(), operator_key(), Network::Testnet);
    let mut pending = submitter.submit(&request).await.unwrap();

    // a second pause while in flight must be refused
    let refusal = gate::check(BreakerFunction::Pause, current, &session, Some(&pending));
    assert!(matches!(refusal, Err(gate::GateRefusal::RequestInFlight)));

    let reconciler = Reconciler::new(reader, fast_policy(1));
    let outcome = reconciler
        .reconcile(&mut pending, BreakerFunction::Pause.expected_state())
        .await;

    assert_eq!(outcome, ReconcileOutcome::Confirmed);
    assert_eq!(pending.phase, RequestPhase::Confirmed);
    assert_eq!(node.broadcast_calls(), 1);
}
