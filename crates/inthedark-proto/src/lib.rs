//! Wire protocol for Connect-in-the-Dark
//!
//! Every message on the connection is a single JSON envelope
//! `{ event_code, message?, data? }`. One transport message carries exactly one
//! event, so there is no framing layer.
//!
//! # Components
//!
//! - [`ServerEventCode`] / [`ClientEventCode`]: closed enumerations of the
//!   numeric event codes in each direction
//! - [`Envelope`]: the raw JSON shape shared by both directions
//! - [`ServerMessage`] / [`ClientMessage`]: typed messages, one variant per
//!   event code, with absent fields already defaulted
//! - [`ProtocolError`]: decode and encode failures for a single message

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod code;
pub mod errors;
mod message;
pub mod payloads;

pub use code::{ClientEventCode, ServerEventCode};
pub use errors::{ProtocolError, Result};
pub use message::{ClientMessage, Membership, ServerMessage};
pub use payloads::{ClientEventData, Envelope, GameData, ServerEventData};
