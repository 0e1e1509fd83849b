//! Connection manager
//!
//! Owns the single persistent connection between the game client and the
//! server. Callers drive it with commands (`connect`, `send`, ...) and feed it
//! the [`LinkReport`]s produced by the transport; it answers with
//! [`ConnectionNotice`]s describing what the application should react to.
//!
//! # Architecture
//!
//! The manager holds no I/O of its own. A [`Connector`] opens [`Link`]s, and
//! each link reports back through whatever channel the connector chose. This
//! keeps the state machine synchronous and lets tests substitute a recording
//! connector.
//!
//! # Components
//!
//! - [`ConnectionManager`]: Connection state machine and outgoing senders
//! - [`Endpoint`]: Server address configuration
//! - [`Connector`], [`Link`]: Transport abstraction
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides
//! [`transport::WsConnector`], a WebSocket connector over tokio-tungstenite.
//!
//! [`testing::MockConnector`] records every link it opens and every text frame
//! sent on them, for tests of code built on the manager.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod endpoint;
mod error;
mod link;
mod manager;

pub mod testing;
#[cfg(feature = "transport")]
pub mod transport;

pub use endpoint::Endpoint;
pub use error::{TransportError, ValidationError, validate_session_id};
pub use inthedark_proto::{ClientMessage, ServerMessage};
pub use link::{Connector, Link, LinkEvent, LinkId, LinkReport};
pub use manager::{ConnectionManager, ConnectionNotice, ConnectionState};
