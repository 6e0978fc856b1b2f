//! # Playback Error Types
//!
//! Errors raised while resolving track references and driving the engine.

use crate::url::UrlError;
use bridge_traits::error::BridgeError;
use std::io;
use thiserror::Error;

/// Errors that can occur on the loading path or the control path.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Reference Errors
    // ========================================================================
    /// A track reference matched the resolvable pattern but its id is
    /// missing or not numeric.
    #[error("Invalid track reference '{reference}': {reason}")]
    InvalidTrackReference { reference: String, reason: String },

    /// The URL returned by the lookup could not be upgraded to https.
    #[error("Invalid track URL: {0}")]
    InvalidUrl(#[from] UrlError),

    // ========================================================================
    // Lifecycle Errors
    // ========================================================================
    /// The session was torn down while the operation was pending.
    #[error("Operation cancelled")]
    Cancelled,

    /// The control-path task is gone and can no longer accept commands.
    #[error("Player control path closed")]
    ControlPathClosed,

    // ========================================================================
    // Engine Errors
    // ========================================================================
    /// A command issued to the host engine failed.
    #[error("Engine error: {0}")]
    Engine(#[from] BridgeError),

    /// I/O-class failure; raised when an unresolvable track is the last
    /// entry of the queue.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl PlaybackError {
    pub(crate) fn invalid_reference(reference: &str, reason: impl Into<String>) -> Self {
        PlaybackError::InvalidTrackReference {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if playback cannot continue past this error.
    ///
    /// A malformed reference is a data error and is never retried; an I/O
    /// error means the queue ran out of entries to fall back to.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PlaybackError::InvalidTrackReference { .. } | PlaybackError::Io(_)
        )
    }

    /// Returns `true` if this error is transient and the operation can be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PlaybackError::Engine(BridgeError::OperationFailed(_))
                | PlaybackError::Engine(BridgeError::NotAvailable(_))
        )
    }
}

impl From<PlaybackError> for BridgeError {
    fn from(error: PlaybackError) -> Self {
        match error {
            PlaybackError::Engine(inner) => inner,
            PlaybackError::Io(inner) => BridgeError::Io(inner),
            PlaybackError::Cancelled => BridgeError::Cancelled,
            PlaybackError::InvalidTrackReference { .. } | PlaybackError::InvalidUrl(_) => {
                BridgeError::InvalidInput(error.to_string())
            }
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let invalid = PlaybackError::invalid_reference("ting://music?id=x", "id is not numeric");
        assert!(invalid.is_fatal());
        assert!(!invalid.is_transient());

        let exhausted = PlaybackError::Io(io::Error::new(io::ErrorKind::NotFound, "queue exhausted"));
        assert!(exhausted.is_fatal());

        let engine = PlaybackError::Engine(BridgeError::OperationFailed("prepare".to_string()));
        assert!(engine.is_transient());
        assert!(!engine.is_fatal());

        assert!(!PlaybackError::Cancelled.is_fatal());
    }

    #[test]
    fn test_bridge_conversion() {
        let io_err: BridgeError =
            PlaybackError::Io(io::Error::new(io::ErrorKind::NotFound, "no next")).into();
        match io_err {
            BridgeError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {:?}", other),
        }

        let invalid: BridgeError =
            PlaybackError::invalid_reference("ting://music", "missing id").into();
        assert!(matches!(invalid, BridgeError::InvalidInput(_)));

        let cancelled: BridgeError = PlaybackError::Cancelled.into();
        assert!(matches!(cancelled, BridgeError::Cancelled));

        let closed: BridgeError = PlaybackError::ControlPathClosed.into();
        assert!(matches!(closed, BridgeError::OperationFailed(_)));
    }
}
