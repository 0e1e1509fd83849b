//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Show a short message to the user.
    Notify(String),

    /// Connect to the server, replacing any live connection.
    Connect {
        /// User id to connect as.
        user_id: String,
    },

    /// Close the connection.
    Disconnect,

    /// Create a session.
    CreateSession,

    /// Join a session.
    JoinSession {
        /// Session id, validated by the bridge.
        session_id: String,
    },

    /// Leave the current session.
    LeaveSession,

    /// Ask the server which session we are in.
    RequestSession,

    /// Start the session's game.
    StartGame,

    /// Play in a column.
    Play {
        /// Zero-based column index.
        column: usize,
    },

    /// Remember the user id for the next quick join.
    CacheUser {
        /// User id to remember.
        user_id: String,
    },

    /// Forget the remembered user id.
    ClearCachedUser,
}
