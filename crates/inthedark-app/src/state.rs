//! Observable application state types.
//!
//! [`SessionState`] and [`GameState`] are the client's view of what the
//! server last said. Neither is ever merged field by field: each server event
//! replaces the parts it carries, and anything absent becomes empty.

use inthedark_proto::GameData;

/// Connection status as far as the UI cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStatus {
    /// No link.
    #[default]
    Offline,
    /// Handshake in flight.
    Connecting,
    /// Link is up.
    Online,
}

/// Session membership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Five-character session id. Empty when not in a session.
    pub session_id: String,
    /// Local user id. Empty until a connection opens.
    pub user_id: String,
    /// Session members in join order.
    pub members: Vec<String>,
}

impl SessionState {
    /// True while the local user belongs to a session.
    pub fn in_session(&self) -> bool {
        !self.session_id.is_empty()
    }

    /// True if `client_id` is the local user.
    pub fn is_local(&self, client_id: &str) -> bool {
        !self.user_id.is_empty() && self.user_id == client_id
    }

    /// Forget the session but keep the local user.
    pub fn leave(&mut self) {
        self.session_id.clear();
        self.members.clear();
    }

    /// Forget everything, including the local user.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Game snapshot, as last sent by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    /// Player ids in move order.
    pub turn_order: Vec<String>,
    /// Index into `turn_order` of the player to move.
    pub turn_index: usize,
    /// Per-column move slots from the local player's view. Non-zero slots
    /// are occupied.
    pub pending_moves: Vec<Vec<u64>>,
}

impl GameState {
    /// Player to move. `None` if `turn_index` is out of range.
    pub fn current_player(&self) -> Option<&str> {
        self.turn_order.get(self.turn_index).map(String::as_str)
    }

    /// True if it is `user_id`'s move.
    pub fn is_local_turn(&self, user_id: &str) -> bool {
        self.current_player().is_some_and(|player| player == user_id)
    }

    /// Number of playable columns.
    pub fn columns(&self) -> usize {
        self.pending_moves.len()
    }

    /// True if no game is known.
    pub fn is_empty(&self) -> bool {
        self.turn_order.is_empty() && self.pending_moves.is_empty()
    }
}

impl From<GameData> for GameState {
    fn from(data: GameData) -> Self {
        Self {
            turn_order: data.player_order,
            turn_index: data.turn_index,
            pending_moves: data.play_indexes,
        }
    }
}
