//! Slash-command parsing.
//!
//! Turns a submitted input line into an app [`Command`]. Bare text is a user
//! id to log in with and a bare number is a column to play, so the common
//! action on each screen needs no prefix.

use inthedark_app::Command;

/// Result of parsing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// A command for the app.
    Command(Command),
    /// Nothing to do (blank line).
    Empty,
    /// Unrecognized slash command.
    Unknown {
        /// The command word as typed.
        input: String,
    },
    /// Known command with bad arguments.
    InvalidArgs {
        /// Command name without the slash.
        command: &'static str,
        /// What is wrong.
        error: String,
    },
}

impl Parsed {
    /// Text to show the user when the line did not produce a command.
    pub fn complaint(&self) -> Option<String> {
        match self {
            Self::Unknown { input } => Some(format!("Unknown command: {input}")),
            Self::InvalidArgs { command, error } => Some(format!("/{command}: {error}")),
            Self::Command(_) | Self::Empty => None,
        }
    }
}

/// Parse a submitted line.
///
/// `cached_user` answers `/yes`.
pub fn parse(line: &str, cached_user: Option<&str>) -> Parsed {
    let line = line.trim();
    if line.is_empty() {
        return Parsed::Empty;
    }

    let Some(rest) = line.strip_prefix('/') else {
        return match line.parse::<usize>() {
            Ok(column) => Parsed::Command(Command::Play { column }),
            Err(_) => Parsed::Command(Command::Login { user_id: line.to_string() }),
        };
    };

    let (word, arg) = match rest.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, arg.trim()),
        None => (rest, ""),
    };

    let command = match word {
        "login" | "l" => {
            if arg.is_empty() {
                return invalid("login", "usage: /login <user id>");
            }
            Command::Login { user_id: arg.to_string() }
        },
        "create" | "c" => Command::CreateSession,
        "join" | "j" => {
            if arg.is_empty() {
                return invalid("join", "usage: /join <room id>");
            }
            Command::JoinSession { session_id: arg.to_string() }
        },
        "leave" => Command::LeaveSession,
        "start" | "s" => Command::StartGame,
        "play" | "p" => match arg.parse::<usize>() {
            Ok(column) => Command::Play { column },
            Err(_) => return invalid("play", "usage: /play <column>"),
        },
        "disconnect" | "dc" => Command::Disconnect,
        "yes" | "y" => match cached_user {
            Some(user_id) => Command::Login { user_id: user_id.to_string() },
            None => return invalid("yes", "no remembered user id"),
        },
        "back" => Command::AbandonQuickJoin,
        "forget" => Command::ForgetCachedUser,
        "quit" | "q" => Command::Quit,
        _ => return Parsed::Unknown { input: format!("/{word}") },
    };

    Parsed::Command(command)
}

fn invalid(command: &'static str, error: &str) -> Parsed {
    Parsed::InvalidArgs { command, error: error.to_string() }
}
