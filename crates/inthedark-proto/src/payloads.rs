//! JSON shapes exchanged on the wire.
//!
//! These mirror the server's serde types field for field. Every field is
//! optional on the wire: absent values are omitted when encoding and default
//! to empty when decoding.

use serde::{Deserialize, Serialize};

/// Envelope shared by both directions.
///
/// `event_code` is kept as a raw integer here so an unknown code can be
/// reported as such instead of as a generic JSON failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<D> {
    /// Numeric event code.
    pub event_code: u64,
    /// Human-readable message, used by error events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Structured payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<D>,
}

/// Game snapshot as sent by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameData {
    /// Index into `player_order` of the player to move.
    #[serde(default)]
    pub turn_index: usize,
    /// Player ids in move order.
    #[serde(default)]
    pub player_order: Vec<String>,
    /// Per-column stacked move slots, from the receiving player's view.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub play_indexes: Vec<Vec<u64>>,
}

/// Payload of a server event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEventData {
    /// Five-character session id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// The client the event is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Full member list of the session, in join order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_client_ids: Option<Vec<String>>,
    /// Game snapshot, present once a game exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_data: Option<GameData>,
}

/// Payload of a client event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientEventData {
    /// Session to join.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Column to play in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    /// Other clients the request is aimed at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ids: Option<Vec<String>>,
}
