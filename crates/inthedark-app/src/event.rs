//! Application input events.
//!
//! This module defines [`AppEvent`], the inputs that drive the
//! [`crate::App`] state machine besides user commands. They all originate
//! from the connection and are produced by the [`crate::Bridge`].

use inthedark_proto::ServerMessage;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Connection attempt started.
    Connecting,

    /// Connection open.
    Connected {
        /// User the connection belongs to.
        user_id: String,
    },

    /// Connection gone.
    Disconnected,

    /// Connection failed.
    ConnectionFailed {
        /// Error description.
        reason: String,
    },

    /// Message from the server.
    Server(ServerMessage),

    /// A server frame could not be decoded and was dropped.
    Undecodable {
        /// Decode error description.
        reason: String,
    },

    /// A request was rejected locally before it was sent.
    Rejected {
        /// Why, in user-facing words.
        reason: String,
    },
}
