//! Typed protocol messages.
//!
//! [`ServerMessage`] and [`ClientMessage`] carry one variant per event code.
//! Conversion to and from [`Envelope`] is the only place that knows how each
//! code lays out its `data`; everything above this module matches on the
//! variants, so adding a code is a compile error until every consumer
//! handles it.
//!
//! # Defaults
//!
//! Server payload fields are all optional on the wire. Decoding fills absent
//! strings with `""`, absent lists with `[]` and absent numbers with `0`, so
//! consumers never see a partially populated message. Client messages keep
//! their required fields strict: a `JoinSession` without a session id is a
//! [`ProtocolError::MissingField`].

use serde::de::DeserializeOwned;

use crate::{
    ClientEventCode, ClientEventData, Envelope, GameData, ServerEventCode, ServerEventData,
    errors::{ProtocolError, Result},
};

/// Membership change carried by `ClientJoined` and `ClientLeft`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Membership {
    /// Client the event is about.
    pub client_id: String,
    /// Session the client joined or left.
    pub session_id: String,
    /// Session member list after the change.
    pub members: Vec<String>,
}

/// A decoded server-to-client event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// A client joined a session.
    ClientJoined(Membership),
    /// A client left a session.
    ClientLeft(Membership),
    /// The game started.
    GameStarted(GameData),
    /// Current session of this client, sent in reply to `SessionRequest`.
    SessionResponse {
        /// Session id.
        session_id: String,
        /// Member list.
        members: Vec<String>,
        /// Running game, if the session has one.
        game: Option<GameData>,
    },
    /// A new turn started.
    TurnStart(GameData),
    /// The server rejected a request.
    LogicError {
        /// Reason given by the server.
        message: String,
    },
    /// The session being joined already has a game running.
    CannotJoinInProgress,
    /// The game finished.
    GameEnded {
        /// Winning client.
        winner: String,
        /// Final board.
        play_indexes: Vec<Vec<u64>>,
    },
}

impl ServerMessage {
    /// Event code of this message.
    #[must_use]
    pub const fn code(&self) -> ServerEventCode {
        match self {
            Self::ClientJoined(_) => ServerEventCode::ClientJoined,
            Self::ClientLeft(_) => ServerEventCode::ClientLeft,
            Self::GameStarted(_) => ServerEventCode::GameStarted,
            Self::SessionResponse { .. } => ServerEventCode::SessionResponse,
            Self::TurnStart(_) => ServerEventCode::TurnStart,
            Self::LogicError { .. } => ServerEventCode::LogicError,
            Self::CannotJoinInProgress => ServerEventCode::CannotJoinInProgress,
            Self::GameEnded { .. } => ServerEventCode::GameEnded,
        }
    }

    /// Decode one server message from its JSON text.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::Malformed`] if the text is not an envelope
    /// - [`ProtocolError::UnknownServerCode`] if the code is unassigned
    /// - [`ProtocolError::InvalidPayload`] if `data` has the wrong shape
    pub fn decode(text: &str) -> Result<Self> {
        let envelope = parse_envelope(text)?;
        let code = ServerEventCode::from_u64(envelope.event_code)
            .ok_or(ProtocolError::UnknownServerCode(envelope.event_code))?;
        let data: ServerEventData = parse_data(code.as_u8(), envelope.data)?;

        Ok(Self::from_parts(code, envelope.message, data))
    }

    /// Encode this message as the server would send it.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(&self.to_envelope()).map_err(ProtocolError::Encode)
    }

    /// Build the wire envelope for this message.
    #[must_use]
    pub fn to_envelope(&self) -> Envelope<ServerEventData> {
        let mut message = None;
        let data = match self {
            Self::ClientJoined(membership) | Self::ClientLeft(membership) => {
                Some(ServerEventData {
                    session_id: Some(membership.session_id.clone()),
                    client_id: Some(membership.client_id.clone()),
                    session_client_ids: Some(membership.members.clone()),
                    game_data: None,
                })
            },
            Self::GameStarted(game) | Self::TurnStart(game) => {
                Some(ServerEventData { game_data: Some(game.clone()), ..Default::default() })
            },
            Self::SessionResponse { session_id, members, game } => Some(ServerEventData {
                session_id: Some(session_id.clone()),
                client_id: None,
                session_client_ids: Some(members.clone()),
                game_data: game.clone(),
            }),
            Self::LogicError { message: text } => {
                message = Some(text.clone());
                None
            },
            Self::CannotJoinInProgress => None,
            Self::GameEnded { winner, play_indexes } => Some(ServerEventData {
                client_id: Some(winner.clone()),
                game_data: Some(GameData {
                    play_indexes: play_indexes.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        };

        Envelope { event_code: u64::from(self.code().as_u8()), message, data }
    }

    fn from_parts(code: ServerEventCode, message: Option<String>, data: ServerEventData) -> Self {
        let membership = |data: ServerEventData| Membership {
            client_id: data.client_id.unwrap_or_default(),
            session_id: data.session_id.unwrap_or_default(),
            members: data.session_client_ids.unwrap_or_default(),
        };

        match code {
            ServerEventCode::ClientJoined => Self::ClientJoined(membership(data)),
            ServerEventCode::ClientLeft => Self::ClientLeft(membership(data)),
            ServerEventCode::GameStarted => Self::GameStarted(data.game_data.unwrap_or_default()),
            ServerEventCode::SessionResponse => Self::SessionResponse {
                session_id: data.session_id.unwrap_or_default(),
                members: data.session_client_ids.unwrap_or_default(),
                game: data.game_data,
            },
            ServerEventCode::TurnStart => Self::TurnStart(data.game_data.unwrap_or_default()),
            ServerEventCode::LogicError => {
                Self::LogicError { message: message.unwrap_or_default() }
            },
            ServerEventCode::CannotJoinInProgress => Self::CannotJoinInProgress,
            ServerEventCode::GameEnded => Self::GameEnded {
                winner: data.client_id.unwrap_or_default(),
                play_indexes: data.game_data.map(|game| game.play_indexes).unwrap_or_default(),
            },
        }
    }
}

/// A client-to-server request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Join the session with this id.
    JoinSession {
        /// Five-character session id.
        session_id: String,
    },
    /// Create a session and join it.
    CreateSession,
    /// Leave the current session.
    LeaveSession,
    /// Ask which session this client is in.
    SessionRequest,
    /// Start the game in the current session.
    StartGame,
    /// Play a piece in a column.
    Play {
        /// Zero-based column index.
        column: usize,
    },
}

impl ClientMessage {
    /// Event code of this message.
    #[must_use]
    pub const fn code(&self) -> ClientEventCode {
        match self {
            Self::JoinSession { .. } => ClientEventCode::JoinSession,
            Self::CreateSession => ClientEventCode::CreateSession,
            Self::LeaveSession => ClientEventCode::LeaveSession,
            Self::SessionRequest => ClientEventCode::SessionRequest,
            Self::StartGame => ClientEventCode::StartGame,
            Self::Play { .. } => ClientEventCode::Play,
        }
    }

    /// Build the wire envelope for this message.
    #[must_use]
    pub fn to_envelope(&self) -> Envelope<ClientEventData> {
        let data = match self {
            Self::JoinSession { session_id } => Some(ClientEventData {
                session_id: Some(session_id.clone()),
                ..Default::default()
            }),
            Self::Play { column } => {
                Some(ClientEventData { column: Some(*column), ..Default::default() })
            },
            Self::CreateSession | Self::LeaveSession | Self::SessionRequest | Self::StartGame => {
                None
            },
        };

        Envelope { event_code: u64::from(self.code().as_u8()), message: None, data }
    }

    /// Encode this message as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(&self.to_envelope()).map_err(ProtocolError::Encode)
    }

    /// Decode a client message, as the server does.
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::Malformed`] if the text is not an envelope
    /// - [`ProtocolError::UnknownClientCode`] if the code is unassigned
    /// - [`ProtocolError::InvalidPayload`] if `data` has the wrong shape
    /// - [`ProtocolError::MissingField`] if a required field is absent
    pub fn decode(text: &str) -> Result<Self> {
        let envelope = parse_envelope(text)?;
        let code = ClientEventCode::from_u64(envelope.event_code)
            .ok_or(ProtocolError::UnknownClientCode(envelope.event_code))?;
        let data: ClientEventData = parse_data(code.as_u8(), envelope.data)?;

        match code {
            ClientEventCode::JoinSession => {
                let session_id = data.session_id.ok_or(ProtocolError::MissingField {
                    code: code.as_u8(),
                    field: "session_id",
                })?;
                Ok(Self::JoinSession { session_id })
            },
            ClientEventCode::CreateSession => Ok(Self::CreateSession),
            ClientEventCode::LeaveSession => Ok(Self::LeaveSession),
            ClientEventCode::SessionRequest => Ok(Self::SessionRequest),
            ClientEventCode::StartGame => Ok(Self::StartGame),
            ClientEventCode::Play => {
                let column = data
                    .column
                    .ok_or(ProtocolError::MissingField { code: code.as_u8(), field: "column" })?;
                Ok(Self::Play { column })
            },
        }
    }
}

fn parse_envelope(text: &str) -> Result<Envelope<serde_json::Value>> {
    serde_json::from_str(text).map_err(ProtocolError::Malformed)
}

fn parse_data<D>(code: u8, data: Option<serde_json::Value>) -> Result<D>
where
    D: DeserializeOwned + Default,
{
    match data {
        Some(value) => serde_json::from_value(value)
            .map_err(|source| ProtocolError::InvalidPayload { code, source }),
        None => Ok(D::default()),
    }
}
