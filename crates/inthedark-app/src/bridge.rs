//! Protocol-to-Application translation layer.
//!
//! The [`Bridge`] wraps the [`ConnectionManager`] and adapts it to the
//! application lifecycle.
//!
//! # Responsibilities
//!
//! - Converts [`crate::AppAction`]s into connection calls and outgoing
//!   messages.
//! - Interprets link reports and converts the resulting connection notices
//!   back into [`crate::AppEvent`]s.
//! - Turns local validation failures into events, so they reach the user
//!   the same way server errors do.

use inthedark_client::{ConnectionManager, ConnectionNotice, Connector, LinkReport};

use crate::{AppAction, AppEvent};

/// Bridge between App and the connection manager.
///
/// Generic over the connector so tests can run against a recording one.
pub struct Bridge<C: Connector> {
    connection: ConnectionManager<C>,
}

impl<C: Connector> Bridge<C> {
    /// Create a Bridge over a connection manager.
    pub fn new(connection: ConnectionManager<C>) -> Self {
        Self { connection }
    }

    /// The wrapped connection manager.
    pub fn connection(&self) -> &ConnectionManager<C> {
        &self.connection
    }

    /// Process an App action and return resulting App events.
    pub fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        match action {
            AppAction::Connect { user_id } => {
                let notices = self.connection.connect(&user_id);
                let mut events = vec![AppEvent::Connecting];
                events.extend(Self::notices_to_events(notices));
                events
            },
            AppAction::Disconnect => {
                self.connection.disconnect();
                vec![]
            },
            AppAction::CreateSession => {
                self.connection.create_session();
                vec![]
            },
            AppAction::JoinSession { session_id } => match self.connection.join_session(&session_id) {
                Ok(()) => vec![],
                Err(e) => vec![AppEvent::Rejected { reason: e.to_string() }],
            },
            AppAction::LeaveSession => {
                self.connection.leave_session();
                vec![]
            },
            AppAction::RequestSession => {
                self.connection.request_session();
                vec![]
            },
            AppAction::StartGame => {
                self.connection.start_game();
                vec![]
            },
            AppAction::Play { column } => {
                self.connection.play(column);
                vec![]
            },
            AppAction::Render
            | AppAction::Quit
            | AppAction::Notify(_)
            | AppAction::CacheUser { .. }
            | AppAction::ClearCachedUser => vec![],
        }
    }

    /// Handle a report from a link.
    ///
    /// When the close of a superseded link opens the next one, the app hears
    /// `Connecting` again after `Disconnected`.
    pub fn handle_link_report(&mut self, report: LinkReport) -> Vec<AppEvent> {
        let notices = self.connection.handle_link_event(report);
        let reopened =
            notices.contains(&ConnectionNotice::Closed) && self.connection.is_connecting();

        let mut events = Self::notices_to_events(notices);
        if reopened {
            events.push(AppEvent::Connecting);
        }
        events
    }

    /// Close the connection, if any.
    pub fn shutdown(&mut self) {
        self.connection.disconnect();
    }

    fn notices_to_events(notices: Vec<ConnectionNotice>) -> Vec<AppEvent> {
        notices
            .into_iter()
            .map(|notice| match notice {
                ConnectionNotice::Opened { user_id } => AppEvent::Connected { user_id },
                ConnectionNotice::Closed => AppEvent::Disconnected,
                ConnectionNotice::Error(e) => AppEvent::ConnectionFailed { reason: e.to_string() },
                ConnectionNotice::Message(message) => AppEvent::Server(message),
                ConnectionNotice::Undecodable { reason } => AppEvent::Undecodable { reason },
            })
            .collect()
    }
}
