//! Unified error types for the Herald core.
//!
//! Collaborator calls surface [`ApiError`]; the voice subsystem layers
//! [`VoiceError`] on top for its user-visible failure modes; the persistence
//! port reports [`StoreError`], which callers downgrade to log entries.

use thiserror::Error;

/// Errors surfaced by the messaging, catalog, permission, and voice-transport
/// collaborators.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The platform API rejected the call.
    #[error("api error ({code}): {message}")]
    Api { code: i32, message: String },

    /// The referenced entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The call did not complete in time.
    #[error("api call timed out")]
    Timeout,

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Result type for collaborator API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors from the per-guild voice subsystem.
#[derive(Debug, Clone, Error)]
pub enum VoiceError {
    /// A playback loop is already running on this connection.
    #[error("already playing audio")]
    AlreadyPlaying,

    /// No live voice connection exists for this guild.
    #[error("not connected to a voice channel in this guild")]
    NotConnected,

    /// The voice transport failed.
    #[error(transparent)]
    Transport(#[from] ApiError),
}

/// Error reported by the persistence port.
///
/// Audit-log and stats writes are best-effort; callers log these and move on.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
