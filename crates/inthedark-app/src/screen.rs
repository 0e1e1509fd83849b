//! Top-level screen state machine.

use std::fmt;

/// The screen the front end shows. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    /// Pick a user id and connect.
    #[default]
    Login,
    /// Connected, not in a session.
    Menu,
    /// In a session, waiting for the game to start.
    Lobby,
    /// Game running (or just finished).
    Game,
    /// Joining a room given at startup.
    QuickJoin,
}

/// What can move the screen.
///
/// Events about other users never produce a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenTrigger {
    /// A connection opened after a login.
    LoginSucceeded,
    /// The local user joined a session.
    LocalJoined,
    /// The local user left its session.
    LocalLeft,
    /// The session's game started.
    GameStarted,
    /// The server reported the session we are already in.
    SessionResumed {
        /// The session has a running game.
        in_game: bool,
    },
    /// The session being joined has a game in progress.
    JoinRejected,
    /// The game finished.
    GameEnded,
    /// The user disconnected.
    Disconnected,
    /// The link closed without the user asking.
    TransportClosed,
    /// A room id to join was supplied at startup.
    QuickJoinRequested,
    /// Quick join abandoned, or its room id was invalid.
    QuickJoinAbandoned,
}

impl Screen {
    /// Screen after `trigger`.
    #[must_use]
    pub fn transition(self, trigger: ScreenTrigger) -> Self {
        match (self, trigger) {
            (Self::QuickJoin, ScreenTrigger::LoginSucceeded | ScreenTrigger::TransportClosed) => {
                Self::QuickJoin
            },
            (
                _,
                ScreenTrigger::LoginSucceeded | ScreenTrigger::LocalLeft | ScreenTrigger::JoinRejected,
            ) => Self::Menu,
            (_, ScreenTrigger::LocalJoined | ScreenTrigger::SessionResumed { in_game: false }) => {
                Self::Lobby
            },
            (_, ScreenTrigger::GameStarted | ScreenTrigger::SessionResumed { in_game: true }) => {
                Self::Game
            },
            (screen, ScreenTrigger::GameEnded) => screen,
            (
                _,
                ScreenTrigger::Disconnected
                | ScreenTrigger::TransportClosed
                | ScreenTrigger::QuickJoinAbandoned,
            ) => Self::Login,
            (_, ScreenTrigger::QuickJoinRequested) => Self::QuickJoin,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Menu => "Menu",
            Self::Lobby => "Lobby",
            Self::Game => "Game",
            Self::QuickJoin => "Quick Join",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Screen; 5] =
        [Screen::Login, Screen::Menu, Screen::Lobby, Screen::Game, Screen::QuickJoin];

    #[test]
    fn game_ended_keeps_screen() {
        for screen in ALL {
            assert_eq!(screen.transition(ScreenTrigger::GameEnded), screen);
        }
    }

    #[test]
    fn quick_join_survives_login_and_close() {
        assert_eq!(Screen::QuickJoin.transition(ScreenTrigger::LoginSucceeded), Screen::QuickJoin);
        assert_eq!(Screen::QuickJoin.transition(ScreenTrigger::TransportClosed), Screen::QuickJoin);
        assert_eq!(Screen::QuickJoin.transition(ScreenTrigger::Disconnected), Screen::Login);
    }

    #[test]
    fn session_resume_picks_lobby_or_game() {
        assert_eq!(
            Screen::Menu.transition(ScreenTrigger::SessionResumed { in_game: false }),
            Screen::Lobby
        );
        assert_eq!(
            Screen::Menu.transition(ScreenTrigger::SessionResumed { in_game: true }),
            Screen::Game
        );
    }

    #[test]
    fn login_lands_on_menu() {
        assert_eq!(Screen::Login.transition(ScreenTrigger::LoginSucceeded), Screen::Menu);
    }
}
