//! Recording connector for tests.
//!
//! [`MockConnector`] never touches the network. It records each link it
//! opens, every frame sent on those links and every close request. Clones
//! share the same record, so a test can hand one clone to a
//! [`ConnectionManager`](crate::ConnectionManager) and inspect the other.
//! Link events are injected by the test through
//! [`ConnectionManager::handle_link_event`](crate::ConnectionManager::handle_link_event).

use std::{cell::RefCell, rc::Rc};

use inthedark_proto::ClientMessage;
use url::Url;

use crate::{
    error::TransportError,
    link::{Connector, Link, LinkId},
};

#[derive(Debug, Default)]
struct Record {
    opened: Vec<(LinkId, Url)>,
    sent: Vec<(LinkId, String)>,
    closed: Vec<LinkId>,
}

/// Connector that records instead of connecting.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    record: Rc<RefCell<Record>>,
}

impl MockConnector {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Links opened so far, oldest first.
    pub fn opened(&self) -> Vec<LinkId> {
        self.record.borrow().opened.iter().map(|(id, _)| *id).collect()
    }

    /// Most recently opened link.
    pub fn last_opened(&self) -> Option<LinkId> {
        self.record.borrow().opened.last().map(|(id, _)| *id)
    }

    /// URLs links were opened to, oldest first.
    pub fn urls(&self) -> Vec<Url> {
        self.record.borrow().opened.iter().map(|(_, url)| url.clone()).collect()
    }

    /// Every text frame sent, on any link, in send order.
    pub fn sent(&self) -> Vec<String> {
        self.record.borrow().sent.iter().map(|(_, text)| text.clone()).collect()
    }

    /// Sent frames decoded the way the server would. Undecodable frames are
    /// skipped.
    pub fn sent_messages(&self) -> Vec<ClientMessage> {
        self.record.borrow().sent.iter().filter_map(|(_, text)| ClientMessage::decode(text).ok()).collect()
    }

    /// Links that were asked to close, in order.
    pub fn closed(&self) -> Vec<LinkId> {
        self.record.borrow().closed.clone()
    }

    /// Forget sent frames, keeping the link history.
    pub fn clear_sent(&self) {
        self.record.borrow_mut().sent.clear();
    }
}

impl Connector for MockConnector {
    type Link = MockLink;

    fn open(&mut self, id: LinkId, url: &Url) -> MockLink {
        self.record.borrow_mut().opened.push((id, url.clone()));
        MockLink { id, record: Rc::clone(&self.record), closing: false }
    }
}

/// Link handed out by [`MockConnector`].
#[derive(Debug)]
pub struct MockLink {
    id: LinkId,
    record: Rc<RefCell<Record>>,
    closing: bool,
}

impl Link for MockLink {
    fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        if self.closing {
            return Err(TransportError::Closed);
        }
        self.record.borrow_mut().sent.push((self.id, text));
        Ok(())
    }

    fn close(&mut self) {
        if !self.closing {
            self.closing = true;
            self.record.borrow_mut().closed.push(self.id);
        }
    }
}
