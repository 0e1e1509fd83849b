//! Protocol error types.
//!
//! A protocol error is always scoped to the one message being encoded or
//! decoded. Callers log and drop the message; the connection stays up.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding a single message.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Text was not a JSON envelope.
    #[error("malformed envelope: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Server sent a code this client does not know.
    #[error("unknown server event code {0}")]
    UnknownServerCode(u64),

    /// Client sent a code the server does not know.
    #[error("unknown client event code {0}")]
    UnknownClientCode(u64),

    /// `data` did not match the shape for its event code.
    #[error("invalid payload for event code {code}: {source}")]
    InvalidPayload {
        /// Wire value of the event code.
        code: u8,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A field required by the event code was absent.
    #[error("event code {code} requires field `{field}`")]
    MissingField {
        /// Wire value of the event code.
        code: u8,
        /// Name of the missing field.
        field: &'static str,
    },

    /// Serialization failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),
}
