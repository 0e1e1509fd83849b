//! Application state machine.
//!
//! This module defines the [`App`] state machine, which owns the session,
//! game and screen state completely decoupled from I/O and protocol
//! mechanics.
//!
//! This is a pure state machine: it consumes [`crate::Command`]s and
//! [`crate::AppEvent`]s and produces [`crate::AppAction`] instructions for the
//! runtime to execute.
//!
//! # Responsibilities
//!
//! - Applies server events to [`SessionState`] and [`GameState`], replacing
//!   whatever each event carries.
//! - Moves the [`Screen`] through its transition table.
//! - Decides which user commands are available on which screen.
//! - Phrases every outcome the user should hear about as a notification.

use inthedark_client::{ValidationError, validate_session_id};
use inthedark_proto::{Membership, ServerMessage};
use url::Url;

use crate::{
    AppAction, AppEvent, Command, GameState, LinkStatus, Screen, ScreenTrigger, SessionState,
};

/// Query key carrying the room id in shareable links.
pub const ROOM_ID_KEY: &str = "roomid";

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies; fully testable without a server.
#[derive(Debug, Clone)]
pub struct App {
    /// Active screen.
    screen: Screen,
    /// Session membership.
    session: SessionState,
    /// Game snapshot.
    game: GameState,
    /// Connection status.
    link: LinkStatus,
    /// Room to join once connected. `None` outside quick join.
    pending_room: Option<String>,
    /// User id remembered from an earlier login, offered by quick join.
    cached_user: Option<String>,
}

impl App {
    /// Create an App. A `pending_room` opens the quick join screen.
    pub fn new(pending_room: Option<String>) -> Self {
        let screen = if pending_room.is_some() {
            Screen::default().transition(ScreenTrigger::QuickJoinRequested)
        } else {
            Screen::default()
        };

        Self {
            screen,
            session: SessionState::default(),
            game: GameState::default(),
            link: LinkStatus::Offline,
            pending_room,
            cached_user: None,
        }
    }

    /// Offer a previously used user id.
    pub fn set_cached_user(&mut self, user_id: Option<String>) {
        self.cached_user = user_id.filter(|id| !id.is_empty());
    }

    /// First actions after startup.
    ///
    /// Checks the quick join room id; an invalid one is reported and sends
    /// the user to login instead.
    pub fn start(&mut self) -> Vec<AppAction> {
        let mut actions = Vec::new();

        if let Some(room) = &self.pending_room
            && let Err(e) = validate_session_id(room)
        {
            tracing::debug!(%room, "invalid quick join room");
            self.pending_room = None;
            self.move_screen(ScreenTrigger::QuickJoinAbandoned);
            actions.push(self.notify(e.to_string()));
        }

        actions.push(AppAction::Render);
        actions
    }

    /// Process a user command and return actions.
    pub fn handle_command(&mut self, command: Command) -> Vec<AppAction> {
        if !self.accepts(&command) {
            let message = format!("Not available on the {} screen.", self.screen);
            return vec![self.notify(message), AppAction::Render];
        }

        match command {
            Command::Login { user_id } => self.login(user_id),
            Command::CreateSession => self.create_session(),
            Command::JoinSession { session_id } => self.join_session(session_id),
            Command::LeaveSession => self.leave_session(),
            Command::StartGame => self.start_game(),
            Command::Play { column } => self.play(column),
            Command::Disconnect => self.disconnect(),
            Command::AbandonQuickJoin => self.abandon_quick_join(),
            Command::ForgetCachedUser => self.forget_cached_user(),
            Command::Quit => self.quit(),
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Connecting => {
                self.link = LinkStatus::Connecting;
                vec![AppAction::Render]
            },
            AppEvent::Connected { user_id } => self.on_connected(user_id),
            AppEvent::Disconnected => {
                self.link = LinkStatus::Offline;
                self.session.reset();
                self.game = GameState::default();
                self.move_screen(ScreenTrigger::TransportClosed);
                vec![self.notify("Disconnected.."), AppAction::Render]
            },
            AppEvent::ConnectionFailed { reason } => {
                tracing::debug!(%reason, "connection failed");
                self.link = LinkStatus::Offline;
                let mut actions = vec![self.notify("Error: ID may already be taken.")];
                if self.screen == Screen::QuickJoin {
                    self.cached_user = None;
                    actions.push(AppAction::ClearCachedUser);
                }
                actions.push(AppAction::Render);
                actions
            },
            AppEvent::Server(message) => self.on_server_message(message),
            AppEvent::Undecodable { reason } => {
                let text = format!("Ignored a malformed server message ({reason})");
                vec![self.notify(text), AppAction::Render]
            },
            AppEvent::Rejected { reason } => vec![self.notify(reason), AppAction::Render],
        }
    }

    /// Connect as `user_id`.
    pub fn login(&mut self, user_id: String) -> Vec<AppAction> {
        let user_id = user_id.trim().to_string();
        if user_id.is_empty() {
            return vec![self.notify(ValidationError::EmptyUserId.to_string()), AppAction::Render];
        }
        vec![AppAction::Connect { user_id }, AppAction::Render]
    }

    /// Create a session.
    pub fn create_session(&self) -> Vec<AppAction> {
        vec![AppAction::CreateSession, AppAction::Render]
    }

    /// Join a session by id. Validated by the bridge before sending.
    pub fn join_session(&self, session_id: String) -> Vec<AppAction> {
        let session_id = session_id.trim().to_string();
        vec![AppAction::JoinSession { session_id }, AppAction::Render]
    }

    /// Leave the current session.
    pub fn leave_session(&self) -> Vec<AppAction> {
        vec![AppAction::LeaveSession, AppAction::Render]
    }

    /// Start the session's game.
    pub fn start_game(&self) -> Vec<AppAction> {
        vec![AppAction::StartGame, AppAction::Render]
    }

    /// Play in `column`.
    pub fn play(&self, column: usize) -> Vec<AppAction> {
        vec![AppAction::Play { column }, AppAction::Render]
    }

    /// Drop the connection and return to login.
    pub fn disconnect(&mut self) -> Vec<AppAction> {
        self.session.reset();
        self.game = GameState::default();
        self.move_screen(ScreenTrigger::Disconnected);
        vec![AppAction::Disconnect, AppAction::Render]
    }

    /// Stop quick-joining and return to login.
    pub fn abandon_quick_join(&mut self) -> Vec<AppAction> {
        self.pending_room = None;
        self.move_screen(ScreenTrigger::QuickJoinAbandoned);
        vec![AppAction::Disconnect, AppAction::Render]
    }

    /// Forget the cached user id.
    pub fn forget_cached_user(&mut self) -> Vec<AppAction> {
        self.cached_user = None;
        vec![AppAction::ClearCachedUser, AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&self) -> Vec<AppAction> {
        vec![AppAction::Quit]
    }

    /// True if `command` makes sense on the current screen.
    pub fn accepts(&self, command: &Command) -> bool {
        match command {
            Command::Login { .. } => matches!(self.screen, Screen::Login | Screen::QuickJoin),
            Command::CreateSession | Command::JoinSession { .. } => self.screen == Screen::Menu,
            Command::LeaveSession | Command::StartGame => self.screen == Screen::Lobby,
            Command::Play { .. } => self.screen == Screen::Game,
            Command::Disconnect => {
                matches!(self.screen, Screen::Menu | Screen::Lobby | Screen::Game)
            },
            Command::AbandonQuickJoin | Command::ForgetCachedUser => {
                self.screen == Screen::QuickJoin
            },
            Command::Quit => true,
        }
    }

    fn on_connected(&mut self, user_id: String) -> Vec<AppAction> {
        self.link = LinkStatus::Online;
        self.session.user_id.clone_from(&user_id);

        let mut actions = vec![self.notify("Connected."), AppAction::RequestSession];
        if self.screen == Screen::QuickJoin
            && let Some(session_id) = self.pending_room.take()
        {
            actions.push(AppAction::JoinSession { session_id });
        }
        self.cached_user = Some(user_id.clone());
        actions.push(AppAction::CacheUser { user_id });

        self.move_screen(ScreenTrigger::LoginSucceeded);
        actions.push(AppAction::Render);
        actions
    }

    fn on_server_message(&mut self, message: ServerMessage) -> Vec<AppAction> {
        let notification = match message {
            ServerMessage::ClientJoined(Membership { client_id, session_id, members }) => {
                let created = members.len() == 1;
                self.session.members = members;
                if self.session.is_local(&client_id) {
                    self.session.session_id = session_id;
                    self.move_screen(ScreenTrigger::LocalJoined);
                    let text = if created { "Created New Session!" } else { "Joined Session!" };
                    Some(text.to_string())
                } else {
                    Some(format!("User {client_id} Joined!"))
                }
            },
            ServerMessage::ClientLeft(Membership { client_id, .. }) => {
                if self.session.is_local(&client_id) {
                    self.session.leave();
                    self.game = GameState::default();
                    self.move_screen(ScreenTrigger::LocalLeft);
                    Some("Left the Session.".to_string())
                } else {
                    self.session.members.retain(|member| *member != client_id);
                    Some(format!("User {client_id} Left!"))
                }
            },
            ServerMessage::GameStarted(game) => {
                self.game = GameState::from(game);
                self.move_screen(ScreenTrigger::GameStarted);
                Some("Game is starting!".to_string())
            },
            ServerMessage::SessionResponse { session_id, members, game } => {
                self.session.session_id = session_id;
                self.session.members = members;
                let in_game = game.is_some();
                self.game = game.map(GameState::from).unwrap_or_default();
                self.move_screen(ScreenTrigger::SessionResumed { in_game });
                let text = if in_game { "Resuming Previous Game!" } else { "Resuming Previous Lobby!" };
                Some(text.to_string())
            },
            ServerMessage::TurnStart(game) => {
                self.game = GameState::from(game);
                None
            },
            ServerMessage::LogicError { message } => Some(message),
            ServerMessage::CannotJoinInProgress => {
                self.move_screen(ScreenTrigger::JoinRejected);
                Some("Cannot join a game that is already in progress.".to_string())
            },
            ServerMessage::GameEnded { winner, play_indexes } => {
                self.game.pending_moves = play_indexes;
                self.move_screen(ScreenTrigger::GameEnded);
                Some(format!("{winner} won!"))
            },
        };

        let mut actions = Vec::new();
        if let Some(text) = notification {
            actions.push(self.notify(text));
        }
        actions.push(AppAction::Render);
        actions
    }

    fn move_screen(&mut self, trigger: ScreenTrigger) {
        let next = self.screen.transition(trigger);
        if next != self.screen {
            tracing::debug!(from = %self.screen, to = %next, ?trigger, "screen change");
        }
        self.screen = next;
    }

    fn notify(&self, message: impl Into<String>) -> AppAction {
        AppAction::Notify(message.into())
    }

    /// Active screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Session membership.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Game snapshot.
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Connection status.
    pub fn link_status(&self) -> LinkStatus {
        self.link
    }

    /// Room quick join will enter once connected.
    pub fn pending_room(&self) -> Option<&str> {
        self.pending_room.as_deref()
    }

    /// User id offered by quick join.
    pub fn cached_user(&self) -> Option<&str> {
        self.cached_user.as_deref()
    }

    /// True if it is the local user's move.
    pub fn is_local_turn(&self) -> bool {
        self.game.is_local_turn(&self.session.user_id)
    }

    /// Link others can open to join the current session. `None` outside a
    /// session.
    pub fn room_link(&self, base: &Url) -> Option<Url> {
        if !self.session.in_session() {
            return None;
        }
        let mut link = base.clone();
        link.query_pairs_mut().clear().append_pair(ROOM_ID_KEY, &self.session.session_id);
        Some(link)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(None)
    }
}
