//! Submitter - signs and broadcasts a built request
//!
//! Two strategies behind one trait, selected by deployment configuration:
//! direct signing with a locally-held key (non-interactive operator paths)
//! and delegated signing through an external wallet agent that never shares
//! key material. Neither retries internally; only the caller knows whether
//! re-submission risks a duplicate effect.

use crate::builder::SignableRequest;
use crate::pending::PendingRequest;
use async_trait::async_trait;
use secp256k1::{Secp256k1, SecretKey};
use stacks_api::{ApiError, NodeClient};
use stacks_codec::{CodecError, Network, Payload, StacksAddress, UnsignedTransaction};
use std::sync::Arc;
use thiserror::Error;

/// Terminal failures of one submission attempt
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The network understood and refused the request (bad nonce,
    /// insufficient fee or balance); not safe to retry verbatim
    #[error("submission rejected: {error} (reason: {})", .reason.as_deref().unwrap_or("none"))]
    Rejected {
        error: String,
        reason: Option<String>,
    },

    /// The delegated signer aborted interactively; no system fault
    #[error("signing cancelled by the user")]
    UserCancelled,

    /// Nothing reached the network; safe to retry immediately
    #[error("could not reach the network: {0}")]
    Transport(String),

    /// Local signing failed before anything left the process
    #[error(transparent)]
    Signing(#[from] CodecError),
}

impl From<ApiError> for SubmissionError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Rejected { error, reason } => SubmissionError::Rejected { error, reason },
            other => SubmissionError::Transport(other.to_string()),
        }
    }
}

/// One submission attempt: sign (or hand off) and broadcast
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, request: &SignableRequest) -> Result<PendingRequest, SubmissionError>;
}

/// Direct signing with a locally-held secret key.
///
/// Resolves the account's current ordering nonce from the network right
/// before signing, then broadcasts the signed bytes itself.
pub struct DirectSubmitter<C> {
    client: Arc<C>,
    key: SecretKey,
    sender: StacksAddress,
}

impl<C> DirectSubmitter<C> {
    pub fn new(client: Arc<C>, key: SecretKey, network: Network) -> Self {
        let secp = Secp256k1::new();
        let sender = StacksAddress::from_public_key(network.address_version(), &key.public_key(&secp));
        Self {
            client,
            key,
            sender,
        }
    }

    /// Address the submitted transactions will originate from
    pub fn sender(&self) -> &StacksAddress {
        &self.sender
    }
}

#[async_trait]
impl<C: NodeClient> Submitter for DirectSubmitter<C> {
    async fn submit(&self, request: &SignableRequest) -> Result<PendingRequest, SubmissionError> {
        // nonce must be fresh at sign time to avoid ordering collisions
        let nonce = self.client.account_nonce(&self.sender.encode()).await?;

        let unsigned = UnsignedTransaction::for_network(
            request.network,
            request.fee,
            nonce,
            request.post_condition_mode,
            request.anchor_mode,
            Payload::ContractCall {
                contract: *request.contract.owner(),
                contract_name: request.contract.name().to_string(),
                function_name: request.function.wire_name().to_string(),
                args: request.args.clone(),
            },
        );
        let signed = unsigned.sign(&self.key)?;

        tracing::info!(
            "broadcasting {} on {} (nonce {}, txid {})",
            request.function,
            request.contract,
            nonce,
            signed.txid()
        );
        let txid = self.client.broadcast(signed.bytes()).await?;
        Ok(PendingRequest::submitted(request.function, txid))
    }
}

/// What the external wallet reported back
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletOutcome {
    /// The wallet signed and broadcast the call itself
    Submitted { txid: String },
    /// The user aborted before signing
    Cancelled,
}

/// External signer boundary; the implementation runs out of process and
/// never exposes key material to this system
#[async_trait]
pub trait WalletBridge: Send + Sync {
    async fn request_contract_call(
        &self,
        request: &SignableRequest,
    ) -> Result<WalletOutcome, SubmissionError>;
}

/// Delegated signing through a [`WalletBridge`]
pub struct DelegatedSubmitter {
    bridge: Arc<dyn WalletBridge>,
}

impl DelegatedSubmitter {
    pub fn new(bridge: Arc<dyn WalletBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl Submitter for DelegatedSubmitter {
    async fn submit(&self, request: &SignableRequest) -> Result<PendingRequest, SubmissionError> {
        match self.bridge.request_contract_call(request).await? {
            WalletOutcome::Submitted { txid } => {
                tracing::info!("wallet submitted {} (txid {})", request.function, txid);
                Ok(PendingRequest::submitted(request.function, txid))
            }
            WalletOutcome::Cancelled => {
                tracing::info!("wallet signing cancelled by the user");
                Err(SubmissionError::UserCancelled)
            }
        }
    }
}
