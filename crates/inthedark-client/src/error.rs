//! Client-side errors.

use thiserror::Error;

/// Length every session id has.
pub const SESSION_ID_LEN: usize = 5;

/// Input rejected before anything was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Session ids are exactly [`SESSION_ID_LEN`] characters.
    #[error("SessionID needs to be {expected} characters")]
    SessionIdLength {
        /// Required length.
        expected: usize,
        /// Length that was given.
        actual: usize,
    },

    /// A connection needs a user id to address the server.
    #[error("User ID cannot be empty")]
    EmptyUserId,
}

/// Transport errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Endpoint could not be turned into a URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The link is gone; the frame was not sent.
    #[error("link closed")]
    Closed,

    /// WebSocket handshake failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Read or write on an open link failed.
    #[error("stream error: {0}")]
    Stream(String),
}

/// Check a session id before it is sent to the server.
///
/// Length is counted in characters, not bytes.
pub fn validate_session_id(session_id: &str) -> Result<(), ValidationError> {
    let actual = session_id.chars().count();
    if actual == SESSION_ID_LEN {
        Ok(())
    } else {
        Err(ValidationError::SessionIdLength { expected: SESSION_ID_LEN, actual })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn five_characters_pass() {
        assert_eq!(validate_session_id("AB12C"), Ok(()));
        assert_eq!(validate_session_id("ÄÖÜßé"), Ok(()));
    }

    #[test]
    fn other_lengths_fail() {
        assert_eq!(
            validate_session_id("ABCD"),
            Err(ValidationError::SessionIdLength { expected: 5, actual: 4 })
        );
        assert_eq!(
            validate_session_id(""),
            Err(ValidationError::SessionIdLength { expected: 5, actual: 0 })
        );
    }

    #[test]
    fn message_matches_notification_text() {
        let err = validate_session_id("ABCDEF").unwrap_err();
        assert_eq!(err.to_string(), "SessionID needs to be 5 characters");
    }
}
