//! Application layer for the Connect-in-the-Dark client
//!
//! Pure state machines and a generic runtime that turn user commands and
//! server events into screen changes, state updates and notifications.
//!
//! # Components
//!
//! - [`App`]: Session, game and screen state machine
//! - [`Bridge`]: Protocol bridge (translates App actions to connection calls)
//! - [`Driver`]: Trait for front-end I/O
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod bridge;
mod command;
mod driver;
mod event;
mod runtime;
mod screen;
mod state;

pub use action::AppAction;
pub use app::{App, ROOM_ID_KEY};
pub use bridge::Bridge;
pub use command::Command;
pub use driver::Driver;
pub use event::AppEvent;
pub use runtime::Runtime;
pub use screen::{Screen, ScreenTrigger};
pub use state::{GameState, LinkStatus, SessionState};
