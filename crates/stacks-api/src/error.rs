//! API Errors

use thiserror::Error;

/// Node API failure taxonomy.
///
/// `Transport` means nothing reached the node and a verbatim retry is safe;
/// `Rejected` means the node understood and refused the request, so the
/// transaction must be rebuilt before retrying.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("node returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transaction rejected: {error} (reason: {})", .reason.as_deref().unwrap_or("none"))]
    Rejected {
        error: String,
        reason: Option<String>,
    },

    #[error("malformed node response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl ApiError {
    /// True when the request may not have reached the node at all
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
