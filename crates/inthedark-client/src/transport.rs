//! WebSocket transport for the client.
//!
//! Provides [`WsConnector`], which runs one tokio task per link. The task
//! performs the handshake, forwards outgoing text frames and reports what
//! happens on the socket. Protocol logic stays in the
//! [`ConnectionManager`](crate::ConnectionManager).
//!
//! Every link reports on the single channel returned by
//! [`WsConnector::new`], tagged with its [`LinkId`]. `Closed` is always the
//! last report of a link, whether it ended cleanly, failed to connect or
//! broke mid-stream.

use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use crate::{
    error::TransportError,
    link::{Connector, Link, LinkEvent, LinkId, LinkReport},
};

/// Opens WebSocket links.
///
/// [`Connector::open`] spawns onto the current tokio runtime and must be
/// called from within one.
#[derive(Debug, Clone)]
pub struct WsConnector {
    reports: mpsc::UnboundedSender<LinkReport>,
}

impl WsConnector {
    /// Create a connector and the receiver all its links report to.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LinkReport>) {
        let (reports, rx) = mpsc::unbounded_channel();
        (Self { reports }, rx)
    }
}

impl Connector for WsConnector {
    type Link = WsLink;

    fn open(&mut self, id: LinkId, url: &Url) -> WsLink {
        let (commands, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_link(id, url.to_string(), rx, self.reports.clone()));
        WsLink { commands }
    }
}

enum Command {
    Text(String),
    Close,
}

/// Handle to one WebSocket link.
///
/// Dropping the handle closes the link.
#[derive(Debug)]
pub struct WsLink {
    commands: mpsc::UnboundedSender<Command>,
}

impl Link for WsLink {
    fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        self.commands.send(Command::Text(text)).map_err(|_| TransportError::Closed)
    }

    fn close(&mut self) {
        // Task already gone means the link is already closed
        let _ = self.commands.send(Command::Close);
    }
}

/// Run a link to completion, then report `Closed`.
async fn run_link(
    id: LinkId,
    url: String,
    mut commands: mpsc::UnboundedReceiver<Command>,
    reports: mpsc::UnboundedSender<LinkReport>,
) {
    let report = |event| {
        // Receiver gone means nobody is listening any more
        let _ = reports.send(LinkReport::new(id, event));
    };

    if let Err(e) = drive(&url, &mut commands, &report).await {
        tracing::debug!(link = %id, error = %e, "link failed");
        report(LinkEvent::Error(e));
    }
    report(LinkEvent::Closed);
}

/// Handshake, then shuttle frames until either side closes.
///
/// Text queued before the handshake completes is sent right after it.
async fn drive(
    url: &str,
    commands: &mut mpsc::UnboundedReceiver<Command>,
    report: &impl Fn(LinkEvent),
) -> Result<(), TransportError> {
    let mut queued = Vec::new();
    let handshake = connect_async(url);
    tokio::pin!(handshake);

    let stream = loop {
        tokio::select! {
            result = &mut handshake => {
                let (stream, _) = result.map_err(|e| TransportError::Connection(e.to_string()))?;
                break stream;
            },
            command = commands.recv() => match command {
                Some(Command::Text(text)) => queued.push(text),
                Some(Command::Close) | None => return Ok(()),
            },
        }
    };

    report(LinkEvent::Opened);
    let (mut sink, mut source) = stream.split();

    for text in queued {
        sink.send(Message::text(text)).await.map_err(stream_error)?;
    }

    loop {
        tokio::select! {
            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => report(LinkEvent::Message(text.as_str().to_owned())),
                Some(Ok(Message::Close(_))) | None => return Ok(()),
                Some(Ok(_)) => {},
                Some(Err(e)) => return Err(stream_error(e)),
            },
            command = commands.recv() => match command {
                Some(Command::Text(text)) => {
                    sink.send(Message::text(text)).await.map_err(stream_error)?;
                },
                Some(Command::Close) | None => {
                    // Best effort; the peer may already be gone
                    let _ = sink.send(Message::Close(None)).await;
                    return Ok(());
                },
            },
        }
    }
}

fn stream_error(e: tokio_tungstenite::tungstenite::Error) -> TransportError {
    TransportError::Stream(e.to_string())
}
