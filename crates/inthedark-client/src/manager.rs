//! Connection state machine.
//!
//! The manager owns at most one live [`Link`]. Replacing a live link is a two
//! step affair: the old link is asked to close, and only once it reports
//! `Closed` is the new one opened. Consumers therefore always see the old
//! link's close notice before the new link's open notice.
//!
//! ```text
//! Idle ──connect──▶ Connecting ──Opened──▶ Open
//!                        │                   │
//!                        └──disconnect───────┴──▶ Disconnecting ──Closed──▶ Closed
//!                                                      │
//!                                                      └──Closed (reconnect)──▶ Connecting
//! ```

use inthedark_proto::{ClientMessage, ProtocolError, ServerMessage};
use tracing::{debug, info, warn};

use crate::{
    endpoint::Endpoint,
    error::{TransportError, ValidationError, validate_session_id},
    link::{Connector, Link, LinkEvent, LinkId, LinkReport},
};

/// Where the connection is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Never connected.
    Idle,
    /// Link opened, handshake in flight.
    Connecting {
        /// Link being opened.
        link: LinkId,
        /// User the link is for.
        user_id: String,
    },
    /// Link is up.
    Open {
        /// Live link.
        link: LinkId,
        /// User the link is for.
        user_id: String,
    },
    /// Link asked to close, waiting for it to report `Closed`.
    Disconnecting {
        /// Link being closed.
        link: LinkId,
        /// User to connect as once the link is gone.
        reconnect_as: Option<String>,
    },
    /// Last link closed, nothing pending.
    Closed,
}

/// Outcome the application reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionNotice {
    /// A link finished its handshake.
    Opened {
        /// User the link is for.
        user_id: String,
    },
    /// The current link is gone.
    Closed,
    /// The current link failed, or could not be created.
    Error(TransportError),
    /// A server message arrived.
    Message(ServerMessage),
    /// A text frame arrived that is not a valid server message. It was
    /// dropped.
    Undecodable {
        /// Why decoding failed.
        reason: String,
    },
}

/// Owns the connection to the game server.
///
/// Created once and kept for the whole process; the link inside it is
/// replaced on every `connect`.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    endpoint: Endpoint,
    state: ConnectionState,
    link: Option<C::Link>,
    next_link: u64,
}

impl<C: Connector> ConnectionManager<C> {
    /// Create a manager with no link.
    pub fn new(connector: C, endpoint: Endpoint) -> Self {
        Self { connector, endpoint, state: ConnectionState::Idle, link: None, next_link: 1 }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// True once the current link has completed its handshake.
    pub fn is_open(&self) -> bool {
        matches!(self.state, ConnectionState::Open { .. }) && self.link.is_some()
    }

    /// True while a link is opened but its handshake has not finished.
    pub fn is_connecting(&self) -> bool {
        matches!(self.state, ConnectionState::Connecting { .. })
    }

    /// User the current link belongs to, while connecting or open.
    pub fn user_id(&self) -> Option<&str> {
        match &self.state {
            ConnectionState::Connecting { user_id, .. } | ConnectionState::Open { user_id, .. } => {
                Some(user_id)
            },
            ConnectionState::Idle
            | ConnectionState::Disconnecting { .. }
            | ConnectionState::Closed => None,
        }
    }

    /// Connect as `user_id`, replacing any live link.
    ///
    /// With a live link, that link is closed first and the new one opened
    /// when its `Closed` report arrives. Returns an `Error` notice straight
    /// away if no URL can be built for the user; no link is touched then.
    pub fn connect(&mut self, user_id: &str) -> Vec<ConnectionNotice> {
        if let Err(e) = self.endpoint.url(user_id) {
            warn!(%user_id, error = %e, "cannot connect");
            return vec![ConnectionNotice::Error(e)];
        }

        match self.state {
            ConnectionState::Connecting { link, .. } | ConnectionState::Open { link, .. } => {
                debug!(%link, %user_id, "superseding live link");
                self.close_link();
                self.state =
                    ConnectionState::Disconnecting { link, reconnect_as: Some(user_id.to_string()) };
                Vec::new()
            },
            ConnectionState::Disconnecting { ref mut reconnect_as, .. } => {
                *reconnect_as = Some(user_id.to_string());
                Vec::new()
            },
            ConnectionState::Idle | ConnectionState::Closed => self.open_link(user_id),
        }
    }

    /// Close the current link, if any. Cancels a reconnect that was waiting
    /// for the old link to close. Calling it again is a no-op.
    pub fn disconnect(&mut self) {
        match self.state {
            ConnectionState::Connecting { link, .. } | ConnectionState::Open { link, .. } => {
                debug!(%link, "disconnecting");
                self.close_link();
                self.state = ConnectionState::Disconnecting { link, reconnect_as: None };
            },
            ConnectionState::Disconnecting { ref mut reconnect_as, .. } => {
                if reconnect_as.take().is_some() {
                    debug!("pending reconnect cancelled");
                }
            },
            ConnectionState::Idle | ConnectionState::Closed => {
                debug!("disconnect without a live link");
            },
        }
    }

    /// Encode and send a message on the current link.
    ///
    /// Dropped with a warning when there is no link or it is closing.
    pub fn send(&mut self, message: &ClientMessage) {
        let link = match (&self.state, self.link.as_mut()) {
            (ConnectionState::Connecting { .. } | ConnectionState::Open { .. }, Some(link)) => link,
            _ => {
                warn!(code = %message.code(), "no live link, dropping message");
                return;
            },
        };

        let text = match message.encode() {
            Ok(text) => text,
            Err(e) => {
                warn!(code = %message.code(), error = %e, "failed to encode message");
                return;
            },
        };

        if let Err(e) = link.send_text(text) {
            warn!(code = %message.code(), error = %e, "send failed");
        }
    }

    /// Decode one text frame from the server.
    pub fn dispatch(&self, text: &str) -> Result<ServerMessage, ProtocolError> {
        ServerMessage::decode(text)
    }

    /// Ask to join an existing session.
    ///
    /// Nothing is sent unless the id is exactly five characters.
    pub fn join_session(&mut self, session_id: &str) -> Result<(), ValidationError> {
        validate_session_id(session_id)?;
        self.send(&ClientMessage::JoinSession { session_id: session_id.to_string() });
        Ok(())
    }

    /// Ask to create a session.
    pub fn create_session(&mut self) {
        self.send(&ClientMessage::CreateSession);
    }

    /// Ask to leave the current session.
    pub fn leave_session(&mut self) {
        self.send(&ClientMessage::LeaveSession);
    }

    /// Ask which session this client is in.
    pub fn request_session(&mut self) {
        self.send(&ClientMessage::SessionRequest);
    }

    /// Ask to start the session's game.
    pub fn start_game(&mut self) {
        self.send(&ClientMessage::StartGame);
    }

    /// Play in `column`.
    pub fn play(&mut self, column: usize) {
        self.send(&ClientMessage::Play { column });
    }

    /// Process a report from a link.
    ///
    /// Reports from links other than the current one are ignored, so each
    /// link yields at most one `Closed` notice. A link being closed only
    /// reports its `Closed`; whatever else it still delivers is dropped.
    pub fn handle_link_event(&mut self, report: LinkReport) -> Vec<ConnectionNotice> {
        if self.current_link() != Some(report.link) {
            debug!(link = %report.link, "ignoring report from stale link");
            return Vec::new();
        }

        if matches!(self.state, ConnectionState::Disconnecting { .. })
            && !matches!(report.event, LinkEvent::Closed)
        {
            debug!(link = %report.link, "ignoring report from closing link");
            return Vec::new();
        }

        match report.event {
            LinkEvent::Opened => self.on_opened(),
            LinkEvent::Message(text) => match self.dispatch(&text) {
                Ok(message) => vec![ConnectionNotice::Message(message)],
                Err(e) => {
                    warn!(link = %report.link, error = %e, "dropping undecodable message");
                    vec![ConnectionNotice::Undecodable { reason: e.to_string() }]
                },
            },
            LinkEvent::Error(e) => {
                warn!(link = %report.link, error = %e, "link error");
                vec![ConnectionNotice::Error(e)]
            },
            LinkEvent::Closed => self.on_closed(),
        }
    }

    fn current_link(&self) -> Option<LinkId> {
        match self.state {
            ConnectionState::Connecting { link, .. }
            | ConnectionState::Open { link, .. }
            | ConnectionState::Disconnecting { link, .. } => Some(link),
            ConnectionState::Idle | ConnectionState::Closed => None,
        }
    }

    fn open_link(&mut self, user_id: &str) -> Vec<ConnectionNotice> {
        let url = match self.endpoint.url(user_id) {
            Ok(url) => url,
            Err(e) => {
                warn!(%user_id, error = %e, "cannot connect");
                return vec![ConnectionNotice::Error(e)];
            },
        };

        let id = LinkId(self.next_link);
        self.next_link += 1;

        info!(link = %id, %url, "opening link");
        self.link = Some(self.connector.open(id, &url));
        self.state = ConnectionState::Connecting { link: id, user_id: user_id.to_string() };
        Vec::new()
    }

    fn close_link(&mut self) {
        if let Some(link) = self.link.as_mut() {
            link.close();
        }
    }

    fn on_opened(&mut self) -> Vec<ConnectionNotice> {
        match std::mem::replace(&mut self.state, ConnectionState::Idle) {
            ConnectionState::Connecting { link, user_id } => {
                info!(%link, %user_id, "link open");
                self.state = ConnectionState::Open { link, user_id: user_id.clone() };
                vec![ConnectionNotice::Opened { user_id }]
            },
            other => {
                debug!(state = ?other, "open reported outside of connecting");
                self.state = other;
                Vec::new()
            },
        }
    }

    fn on_closed(&mut self) -> Vec<ConnectionNotice> {
        self.link = None;
        let reconnect = match std::mem::replace(&mut self.state, ConnectionState::Closed) {
            ConnectionState::Disconnecting { reconnect_as, .. } => reconnect_as,
            _ => None,
        };
        info!("link closed");

        let mut notices = vec![ConnectionNotice::Closed];
        if let Some(user_id) = reconnect {
            notices.extend(self.open_link(&user_id));
        }
        notices
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::MockConnector;

    fn manager() -> (ConnectionManager<MockConnector>, MockConnector) {
        let connector = MockConnector::new();
        (ConnectionManager::new(connector.clone(), Endpoint::default()), connector)
    }

    fn report(link: LinkId, event: LinkEvent) -> LinkReport {
        LinkReport::new(link, event)
    }

    #[test]
    fn connect_opens_link_for_user() {
        let (mut mgr, mock) = manager();

        assert!(mgr.connect("alice").is_empty());

        let link = mock.last_opened().unwrap();
        assert_eq!(mock.urls()[0].as_str(), "ws://localhost:8000/api/ws/alice");
        assert_eq!(
            mgr.state(),
            &ConnectionState::Connecting { link, user_id: "alice".to_string() }
        );
        assert!(!mgr.is_open());

        let notices = mgr.handle_link_event(report(link, LinkEvent::Opened));
        assert_eq!(notices, vec![ConnectionNotice::Opened { user_id: "alice".to_string() }]);
        assert!(mgr.is_open());
        assert_eq!(mgr.user_id(), Some("alice"));
    }

    #[test]
    fn supersede_closes_before_opening() {
        let (mut mgr, mock) = manager();
        mgr.connect("alice");
        let first = mock.last_opened().unwrap();
        mgr.handle_link_event(report(first, LinkEvent::Opened));

        assert!(mgr.connect("bob").is_empty());
        assert_eq!(mock.closed(), vec![first]);
        assert_eq!(mock.opened().len(), 1, "new link waits for the old one to close");

        let notices = mgr.handle_link_event(report(first, LinkEvent::Closed));
        assert_eq!(notices, vec![ConnectionNotice::Closed]);

        let second = mock.last_opened().unwrap();
        assert_ne!(first, second);
        let notices = mgr.handle_link_event(report(second, LinkEvent::Opened));
        assert_eq!(notices, vec![ConnectionNotice::Opened { user_id: "bob".to_string() }]);
    }

    #[test]
    fn stale_reports_are_ignored() {
        let (mut mgr, mock) = manager();
        mgr.connect("alice");
        let first = mock.last_opened().unwrap();
        mgr.connect("bob");
        mgr.handle_link_event(report(first, LinkEvent::Closed));

        // A duplicate close from the old link must not close the new one
        assert!(mgr.handle_link_event(report(first, LinkEvent::Closed)).is_empty());
        assert!(matches!(mgr.state(), ConnectionState::Connecting { .. }));
    }

    #[test]
    fn disconnect_is_idempotent() {
        let (mut mgr, mock) = manager();
        mgr.disconnect();
        assert_eq!(mgr.state(), &ConnectionState::Idle);

        mgr.connect("alice");
        let link = mock.last_opened().unwrap();
        mgr.disconnect();
        mgr.disconnect();
        assert_eq!(mock.closed(), vec![link]);

        assert_eq!(mgr.handle_link_event(report(link, LinkEvent::Closed)), vec![
            ConnectionNotice::Closed
        ]);
        mgr.disconnect();
        assert_eq!(mgr.state(), &ConnectionState::Closed);
    }

    #[test]
    fn disconnect_cancels_pending_reconnect() {
        let (mut mgr, mock) = manager();
        mgr.connect("alice");
        let link = mock.last_opened().unwrap();
        mgr.connect("bob");
        mgr.disconnect();

        mgr.handle_link_event(report(link, LinkEvent::Closed));
        assert_eq!(mock.opened(), vec![link]);
        assert_eq!(mgr.state(), &ConnectionState::Closed);
    }

    #[test]
    fn closing_link_only_reports_its_close() {
        let (mut mgr, mock) = manager();
        mgr.connect("alice");
        let link = mock.last_opened().unwrap();
        mgr.handle_link_event(report(link, LinkEvent::Opened));
        mgr.disconnect();

        let late = r#"{"event_code":3,"data":{"game_data":{"turn_index":0,"player_order":["alice"]}}}"#;
        assert!(mgr.handle_link_event(report(link, LinkEvent::Message(late.into()))).is_empty());
        assert!(mgr.handle_link_event(report(link, LinkEvent::Message("{nope".into()))).is_empty());
        let error = LinkEvent::Error(TransportError::Stream("reset".into()));
        assert!(mgr.handle_link_event(report(link, error)).is_empty());

        assert_eq!(mgr.handle_link_event(report(link, LinkEvent::Closed)), vec![
            ConnectionNotice::Closed
        ]);
    }

    #[test]
    fn superseded_link_messages_do_not_reach_new_user() {
        let (mut mgr, mock) = manager();
        mgr.connect("alice");
        let first = mock.last_opened().unwrap();
        mgr.handle_link_event(report(first, LinkEvent::Opened));
        mgr.connect("bob");

        let text = r#"{"event_code":7}"#.to_string();
        assert!(mgr.handle_link_event(report(first, LinkEvent::Message(text))).is_empty());

        mgr.handle_link_event(report(first, LinkEvent::Closed));
        assert!(mgr.is_connecting());
        assert_eq!(mgr.user_id(), Some("bob"));
    }

    #[test]
    fn send_without_link_is_dropped() {
        let (mut mgr, mock) = manager();
        mgr.create_session();
        assert!(mock.sent().is_empty());
    }

    #[test]
    fn send_while_closing_is_dropped() {
        let (mut mgr, mock) = manager();
        mgr.connect("alice");
        mgr.disconnect();
        mgr.start_game();
        assert!(mock.sent().is_empty());
    }

    #[test]
    fn join_session_validates_length() {
        let (mut mgr, mock) = manager();
        mgr.connect("alice");

        assert!(mgr.join_session("ABCD").is_err());
        assert!(mock.sent().is_empty());

        mgr.join_session("ABCDE").unwrap();
        assert_eq!(mock.sent_messages(), vec![ClientMessage::JoinSession {
            session_id: "ABCDE".to_string()
        }]);
    }

    #[test]
    fn undecodable_message_is_surfaced_and_dropped() {
        let (mut mgr, mock) = manager();
        mgr.connect("alice");
        let link = mock.last_opened().unwrap();

        let notices = mgr.handle_link_event(report(link, LinkEvent::Message("{nope".into())));
        assert!(matches!(notices.as_slice(), [ConnectionNotice::Undecodable { .. }]));
        assert!(matches!(mgr.state(), ConnectionState::Connecting { .. }));
    }

    #[test]
    fn decoded_message_is_forwarded() {
        let (mut mgr, mock) = manager();
        mgr.connect("alice");
        let link = mock.last_opened().unwrap();
        mgr.handle_link_event(report(link, LinkEvent::Opened));

        let text = r#"{"event_code":7}"#.to_string();
        let notices = mgr.handle_link_event(report(link, LinkEvent::Message(text)));
        assert_eq!(notices, vec![ConnectionNotice::Message(ServerMessage::CannotJoinInProgress)]);
    }

    #[test]
    fn bad_user_id_reports_error_without_link() {
        let (mut mgr, mock) = manager();
        let notices = mgr.connect("");
        assert!(matches!(notices.as_slice(), [ConnectionNotice::Error(_)]));
        assert!(mock.opened().is_empty());
        assert_eq!(mgr.state(), &ConnectionState::Idle);
    }
}
