//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. The network side is not here:
//! the runtime owns the connection.

use std::io::{self, Stdout, stdout};

use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use inthedark_app::{App, Command, Driver};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use url::Url;

use crate::{
    InputState, KeyInput, KeyOutcome, UserCache, View,
    commands::{self, Parsed},
    ui,
};

/// Notifications kept on screen.
const MAX_NOTICES: usize = 16;

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Terminal driver implementing the [`Driver`] trait.
///
/// Owns the input line, the notification list and the user cache. Keeps the
/// last [`View`] so typing can redraw without the app.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_stream: EventStream,
    input: InputState,
    view: View,
    /// Most recent first.
    notices: Vec<String>,
    cache: UserCache,
    link_base: Url,
    queued: Vec<Command>,
}

impl TerminalDriver {
    /// Take over the terminal.
    ///
    /// `link_base` is the page shareable room links point at.
    pub fn new(cache: UserCache, link_base: Url) -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            event_stream: EventStream::new(),
            input: InputState::new(),
            view: View::default(),
            notices: Vec::new(),
            cache,
            link_base,
            queued: Vec::new(),
        })
    }

    /// Run `command` before reading the keyboard. Queued commands run in
    /// order.
    pub fn queue(&mut self, command: Command) {
        self.queued.insert(0, command);
    }

    /// Convert a crossterm key event. Ctrl-C quits like Esc.
    fn convert_key(key: KeyEvent) -> Option<KeyInput> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(KeyInput::Esc)
            },
            KeyCode::Char(c) => Some(KeyInput::Char(c)),
            KeyCode::Enter => Some(KeyInput::Enter),
            KeyCode::Backspace => Some(KeyInput::Backspace),
            KeyCode::Delete => Some(KeyInput::Delete),
            KeyCode::Esc => Some(KeyInput::Esc),
            KeyCode::Left => Some(KeyInput::Left),
            KeyCode::Right => Some(KeyInput::Right),
            KeyCode::Home => Some(KeyInput::Home),
            KeyCode::End => Some(KeyInput::End),
            _ => None,
        }
    }

    fn push_notice(&mut self, message: String) {
        self.notices.insert(0, message);
        self.notices.truncate(MAX_NOTICES);
    }

    fn draw(&mut self) -> Result<(), TerminalError> {
        self.terminal.draw(|frame| {
            ui::render(frame, &self.view, &self.input, &self.notices);
        })?;
        Ok(())
    }

    /// Turn a submitted line into a command, or complain and redraw.
    fn submit(&mut self, line: &str) -> Result<Option<Command>, TerminalError> {
        let parsed = commands::parse(line, self.cache.get());
        if let Some(complaint) = parsed.complaint() {
            self.push_notice(complaint);
        }
        self.draw()?;

        match parsed {
            Parsed::Command(command) => Ok(Some(command)),
            Parsed::Empty | Parsed::Unknown { .. } | Parsed::InvalidArgs { .. } => Ok(None),
        }
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;

    async fn next_command(&mut self) -> Result<Option<Command>, Self::Error> {
        if let Some(command) = self.queued.pop() {
            return Ok(Some(command));
        }

        // Only the stream read awaits, so dropping this future loses nothing
        while let Some(event) = self.event_stream.next().await {
            match event? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let Some(key) = Self::convert_key(key) else {
                        continue;
                    };
                    match self.input.handle_key(key) {
                        KeyOutcome::Edited => self.draw()?,
                        KeyOutcome::Quit => return Ok(Some(Command::Quit)),
                        KeyOutcome::Submitted(line) => {
                            if let Some(command) = self.submit(&line)? {
                                return Ok(Some(command));
                            }
                        },
                    }
                },
                Event::Resize(..) => self.draw()?,
                _ => {},
            }
        }

        Ok(None)
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.view = View::from_app(app, &self.link_base);
        self.draw()
    }

    fn notify(&mut self, message: &str) -> Result<(), Self::Error> {
        self.push_notice(message.to_string());
        self.draw()
    }

    fn cached_user(&self) -> Option<String> {
        self.cache.get().map(ToString::to_string)
    }

    fn cache_user(&mut self, user_id: Option<&str>) -> Result<(), Self::Error> {
        if let Err(e) = self.cache.store(user_id) {
            tracing::warn!(error = %e, "could not update user cache");
        }
        Ok(())
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
