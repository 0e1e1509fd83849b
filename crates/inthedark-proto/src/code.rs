//! Numeric event codes.
//!
//! Codes are small positive integers assigned by declaration order starting at
//! 1, separately for each direction. The numbering is shared with the server
//! and must not be reordered.

use std::fmt;

/// Event codes sent by the server.
///
/// The first four codes concern session membership, the rest the running
/// game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ServerEventCode {
    /// A client joined the session.
    ClientJoined = 1,
    /// A client left the session.
    ClientLeft = 2,
    /// The session's game has started.
    GameStarted = 3,
    /// Reply to a session request with the client's current session.
    SessionResponse = 4,
    /// A new turn has started.
    TurnStart = 5,
    /// The server rejected a request.
    LogicError = 6,
    /// The requested session already has a game in progress.
    CannotJoinInProgress = 7,
    /// The game is over.
    GameEnded = 8,
}

impl ServerEventCode {
    /// Every server code, in wire order.
    pub const ALL: [Self; 8] = [
        Self::ClientJoined,
        Self::ClientLeft,
        Self::GameStarted,
        Self::SessionResponse,
        Self::TurnStart,
        Self::LogicError,
        Self::CannotJoinInProgress,
        Self::GameEnded,
    ];

    /// Look up a code by its wire value. `None` if the value is unassigned.
    #[must_use]
    pub fn from_u64(value: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|code| u64::from(code.as_u8()) == value)
    }

    /// Wire value of this code.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ServerEventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}({})", self.as_u8())
    }
}

/// Event codes sent by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ClientEventCode {
    /// Join an existing session by id.
    JoinSession = 1,
    /// Create a new session and join it.
    CreateSession = 2,
    /// Leave the current session.
    LeaveSession = 3,
    /// Ask for the client's current session, if any.
    SessionRequest = 4,
    /// Start the session's game.
    StartGame = 5,
    /// Drop a piece into a column.
    Play = 6,
}

impl ClientEventCode {
    /// Every client code, in wire order.
    pub const ALL: [Self; 6] = [
        Self::JoinSession,
        Self::CreateSession,
        Self::LeaveSession,
        Self::SessionRequest,
        Self::StartGame,
        Self::Play,
    ];

    /// Look up a code by its wire value. `None` if the value is unassigned.
    #[must_use]
    pub fn from_u64(value: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|code| u64::from(code.as_u8()) == value)
    }

    /// Wire value of this code.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ClientEventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}({})", self.as_u8())
    }
}
