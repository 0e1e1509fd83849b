//! Front-end agnostic user commands.

/// Something the user asked for.
///
/// Decouples application logic from how the front end collects input, so
/// the same [`App`](crate::App) serves a terminal, a test script or any
/// other driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect as this user.
    Login {
        /// User id to connect as.
        user_id: String,
    },
    /// Create a session.
    CreateSession,
    /// Join a session by id.
    JoinSession {
        /// Session id as typed.
        session_id: String,
    },
    /// Leave the current session.
    LeaveSession,
    /// Start the session's game.
    StartGame,
    /// Play in a column.
    Play {
        /// Zero-based column index.
        column: usize,
    },
    /// Drop the connection and go back to login.
    Disconnect,
    /// Stop quick-joining and go back to login.
    AbandonQuickJoin,
    /// Forget the cached user id offered by quick join.
    ForgetCachedUser,
    /// Exit the client.
    Quit,
}
