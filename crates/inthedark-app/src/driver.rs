//! Driver trait for abstracting front-end I/O.
//!
//! The [`Driver`] trait decouples the application runtime from how commands
//! are read and state is shown. Each front end implements the trait, while
//! the generic [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use crate::{App, Command};

/// Abstracts front-end I/O for the application runtime.
///
/// # Implementations
///
/// - **Terminal**: Reads slash commands from a ratatui input line and draws screens
/// - **Tests**: Replays a scripted command list and records what was shown
pub trait Driver: Send {
    /// Front-end specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next user command.
    ///
    /// Returns `None` once input is exhausted. Must be cancel safe: the
    /// runtime drops the future whenever a link report arrives first.
    fn next_command(&mut self) -> impl Future<Output = Result<Option<Command>, Self::Error>> + Send;

    /// Show the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Show a short notification.
    fn notify(&mut self, message: &str) -> Result<(), Self::Error>;

    /// User id remembered from an earlier login.
    fn cached_user(&self) -> Option<String>;

    /// Remember a user id, or forget it with `None`.
    fn cache_user(&mut self, user_id: Option<&str>) -> Result<(), Self::Error>;
}
