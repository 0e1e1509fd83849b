//! Terminal UI for Connect in the Dark
//!
//! A thin shell over [`inthedark_app::Driver`] that provides terminal
//! specific I/O. All orchestration logic lives in the generic
//! [`inthedark_app::Runtime`].
//!
//! This crate only handles input, rendering and the remembered user id.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cache;
pub mod commands;
pub mod input;
pub mod terminal;
pub mod ui;
pub mod view;

pub use cache::{CacheError, UserCache};
pub use input::{InputState, KeyInput, KeyOutcome};
pub use inthedark_app::{App, Bridge, Command, Driver, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
pub use view::View;
