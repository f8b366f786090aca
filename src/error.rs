//! Error taxonomy for the synchronization engine.
//!
//! Every remote call and every table codec operation reports a [`SyncError`].
//! The orchestrator decides which of them are absorbed on the read path and
//! which terminate the current fetch or push.

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The requested file, ref or object does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The branch moved while a commit was being prepared.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Undecodable transport payload or unparsable serialized table.
    #[error("malformed content in {path}: {reason}")]
    MalformedContent { path: String, reason: String },

    #[error("network failure: {0}")]
    Network(String),

    /// Any other non-success response from the remote API.
    #[error("remote API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("settings error: {0}")]
    Settings(String),

    #[error("host error: {0}")]
    Host(String),

    #[error("{0}")]
    Invalid(String),
}

impl SyncError {
    pub fn malformed(path: impl Into<String>, reason: impl ToString) -> Self {
        SyncError::MalformedContent {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncError::NotFound(_))
    }

    /// Credential failures: retrying the next language cannot succeed either.
    pub fn is_auth(&self) -> bool {
        matches!(self, SyncError::Unauthorized(_) | SyncError::Forbidden(_))
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Network(err.to_string())
    }
}
