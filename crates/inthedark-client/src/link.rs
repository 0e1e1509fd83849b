//! Transport abstraction.
//!
//! A [`Link`] is one transport instance, one WebSocket in production. Links
//! report what happens to them as [`LinkReport`]s tagged with the [`LinkId`]
//! they were opened under, so reports from a link that has since been
//! replaced can be told apart from the current one.

use std::fmt;

use url::Url;

use crate::error::TransportError;

/// Identity of one link. Increases with every link the manager opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkId(pub u64);

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link#{}", self.0)
    }
}

/// Something that happened on a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Handshake completed; the link can carry messages.
    Opened,
    /// A text frame arrived.
    Message(String),
    /// The link failed. A `Closed` always follows.
    Error(TransportError),
    /// The link is gone. Always the last event a link reports.
    Closed,
}

/// A [`LinkEvent`] together with the link it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReport {
    /// Link that produced the event.
    pub link: LinkId,
    /// What happened.
    pub event: LinkEvent,
}

impl LinkReport {
    /// Report for `link`.
    pub fn new(link: LinkId, event: LinkEvent) -> Self {
        Self { link, event }
    }
}

/// One open (or opening) transport.
pub trait Link {
    /// Queue a text frame for the server.
    fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    /// Begin closing. The link reports `Closed` once it is gone.
    fn close(&mut self);
}

/// Opens links.
///
/// Opening never fails synchronously: a link that cannot be established
/// reports `Error` followed by `Closed`.
pub trait Connector {
    /// Link type this connector produces.
    type Link: Link;

    /// Start opening a link to `url`. Events are reported under `id`.
    fn open(&mut self, id: LinkId, url: &Url) -> Self::Link;
}
