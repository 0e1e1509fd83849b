//! Text projection of the app state.
//!
//! [`View::from_app`] is the only place that decides what each screen says.
//! The ratatui layer just lays the result out, so screens can be tested as
//! plain text.

use inthedark_app::{App, GameState, LinkStatus, Screen};
use url::Url;

/// Filled board slot.
const FILLED: char = '#';
/// Empty board slot.
const EMPTY: char = '.';

/// What the terminal shows for one app state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    /// Screen title.
    pub title: String,
    /// Screen content, one entry per line.
    pub body: Vec<String>,
    /// Commands available on this screen.
    pub hint: String,
    /// Connection status.
    pub link: LinkStatus,
    /// Local user id. Empty before a connection opens.
    pub user_id: String,
}

impl View {
    /// Project `app` for display. `link_base` is the page room links point at.
    pub fn from_app(app: &App, link_base: &Url) -> Self {
        let (body, hint) = match app.screen() {
            Screen::Login => login(app),
            Screen::QuickJoin => quick_join(app),
            Screen::Menu => menu(app),
            Screen::Lobby => lobby(app, link_base),
            Screen::Game => game(app),
        };

        Self {
            title: app.screen().to_string(),
            body,
            hint: hint.to_string(),
            link: app.link_status(),
            user_id: app.session().user_id.clone(),
        }
    }
}

fn login(app: &App) -> (Vec<String>, &'static str) {
    let mut body = vec!["Enter a user id to connect.".to_string()];
    if app.link_status() == LinkStatus::Connecting {
        body.push("Connecting...".to_string());
    }
    (body, "<user id> | /quit")
}

fn quick_join(app: &App) -> (Vec<String>, &'static str) {
    let room = app.pending_room().map_or_else(
        || "Joining room...".to_string(),
        |room| format!("Joining room {room}."),
    );
    let mut body = vec![room];

    match (app.link_status(), app.cached_user()) {
        (LinkStatus::Offline, Some(user)) => body.push(format!("Join as {user}? (/yes)")),
        (LinkStatus::Offline, None) => body.push("Enter a user id to join with.".to_string()),
        (LinkStatus::Connecting, _) => body.push("Connecting...".to_string()),
        (LinkStatus::Online, _) => {
            body.push(format!("Connected as {}. Waiting for the room...", app.session().user_id));
        },
    }

    (body, "/yes | <user id> | /forget | /back")
}

fn menu(app: &App) -> (Vec<String>, &'static str) {
    let body = vec![format!("Logged in as {}.", app.session().user_id)];
    (body, "/create | /join <room id> | /disconnect | /quit")
}

fn lobby(app: &App, link_base: &Url) -> (Vec<String>, &'static str) {
    let session = app.session();
    let mut body = vec![format!("Room: {}", session.session_id)];
    if let Some(link) = app.room_link(link_base) {
        body.push(format!("Link: {link}"));
    }
    body.push(String::new());
    body.push("Players:".to_string());
    for member in &session.members {
        if session.is_local(member) {
            body.push(format!("  {member} (you)"));
        } else {
            body.push(format!("  {member}"));
        }
    }

    (body, "/start | /leave | /disconnect")
}

fn game(app: &App) -> (Vec<String>, &'static str) {
    let state = app.game();
    let mut body = vec![format!("Players: {}", state.turn_order.join(", ")), String::new()];

    let turn = if app.is_local_turn() {
        "Your Turn".to_string()
    } else {
        state
            .current_player()
            .map_or_else(|| "Waiting for the game...".to_string(), |p| format!("{p}'s Turn"))
    };
    body.push(turn);
    body.push(String::new());
    body.extend(board(state));

    (body, "<column> | /play <column> | /disconnect")
}

/// Board lines: a header of column numbers, then rows from the top.
///
/// The last slot of a column is drawn on top. Shorter columns sit on the
/// bottom row.
pub fn board(state: &GameState) -> Vec<String> {
    let columns = &state.pending_moves;
    if columns.is_empty() {
        return Vec::new();
    }

    let width = columns.len().saturating_sub(1).to_string().len();
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);

    let header: Vec<String> = (0..columns.len()).map(|i| format!("{i:>width$}")).collect();
    let mut lines = vec![header.join(" ")];

    for row in 0..height {
        let slot = height - 1 - row;
        let cells: Vec<String> = columns
            .iter()
            .map(|column| {
                let cell = match column.get(slot) {
                    Some(&value) if value != 0 => FILLED,
                    _ => EMPTY,
                };
                format!("{cell:>width$}")
            })
            .collect();
        lines.push(cells.join(" "));
    }

    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use insta::assert_snapshot;
    use inthedark_app::AppEvent;
    use inthedark_client::ServerMessage;
    use inthedark_proto::{GameData, Membership};

    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:3000/").unwrap()
    }

    fn online(user: &str) -> App {
        let mut app = App::new(None);
        app.handle(AppEvent::Connected { user_id: user.into() });
        app
    }

    #[test]
    fn login_screen() {
        let view = View::from_app(&App::new(None), &base());
        assert_eq!(view.title, "Login");
        assert_snapshot!(view.body.join("\n"), @"Enter a user id to connect.");
    }

    #[test]
    fn quick_join_offers_cached_user() {
        let mut app = App::new(Some("ZZ9PL".into()));
        app.set_cached_user(Some("bob".into()));

        let view = View::from_app(&app, &base());
        assert_eq!(view.title, "Quick Join");
        assert_snapshot!(view.body.join("\n"), @r"
        Joining room ZZ9PL.
        Join as bob? (/yes)
        ");
    }

    #[test]
    fn quick_join_waits_for_room_once_online() {
        let mut app = App::new(Some("ZZ9PL".into()));
        app.handle(AppEvent::Connecting);
        let view = View::from_app(&app, &base());
        assert_snapshot!(view.body.join("\n"), @r"
        Joining room ZZ9PL.
        Connecting...
        ");

        app.handle(AppEvent::Connected { user_id: "bob".into() });
        let view = View::from_app(&app, &base());
        assert_eq!(view.title, "Quick Join");
        assert_snapshot!(view.body.join("\n"), @r"
        Joining room...
        Connected as bob. Waiting for the room...
        ");
    }

    #[test]
    fn lobby_lists_players_and_link() {
        let mut app = online("alice");
        app.handle(AppEvent::Server(ServerMessage::ClientJoined(Membership {
            client_id: "alice".into(),
            session_id: "AB12C".into(),
            members: vec!["bob".into(), "alice".into()],
        })));

        let view = View::from_app(&app, &base());
        assert_eq!(view.title, "Lobby");
        assert_eq!(view.user_id, "alice");
        assert_snapshot!(view.body.join("\n"), @r"
        Room: AB12C
        Link: http://localhost:3000/?roomid=AB12C

        Players:
          bob
          alice (you)
        ");
    }

    #[test]
    fn game_shows_turn_and_board() {
        let mut app = online("alice");
        app.handle(AppEvent::Server(ServerMessage::GameStarted(GameData {
            turn_index: 1,
            player_order: vec!["alice".into(), "bob".into()],
            play_indexes: vec![vec![1, 0, 0], vec![0, 0, 0], vec![5, 5, 0]],
        })));

        let view = View::from_app(&app, &base());
        assert_eq!(view.title, "Game");
        assert_snapshot!(view.body.join("\n"), @r"
        Players: alice, bob

        bob's Turn

        0 1 2
        . . .
        . . #
        # . #
        ");
    }

    #[test]
    fn local_turn_is_announced() {
        let mut app = online("alice");
        app.handle(AppEvent::Server(ServerMessage::GameStarted(GameData {
            turn_index: 0,
            player_order: vec!["alice".into(), "bob".into()],
            play_indexes: Vec::new(),
        })));

        let view = View::from_app(&app, &base());
        assert!(view.body.contains(&"Your Turn".to_string()));
    }

    #[test]
    fn ragged_columns_sit_on_the_bottom() {
        let state = GameState {
            turn_order: Vec::new(),
            turn_index: 0,
            pending_moves: vec![vec![1], vec![0, 1]],
        };
        assert_eq!(board(&state), vec!["0 1", ". #", "# ."]);
    }

    #[test]
    fn wide_boards_pad_cells() {
        let state = GameState {
            turn_order: Vec::new(),
            turn_index: 0,
            pending_moves: vec![vec![1]; 11],
        };
        let lines = board(&state);
        assert!(lines[0].starts_with(" 0  1"));
        assert!(lines[0].ends_with("10"));
        assert_eq!(lines[1], vec![" #"; 11].join(" "));
    }
}
