//! Property-based tests for the connection state machine.
//!
//! Arbitrary interleavings of user commands and link reports, including
//! duplicated and stale reports, must never leave more than one live link or
//! let a new link open before the previous one has closed.

use inthedark_client::{
    ClientMessage, ConnectionManager, ConnectionNotice, ConnectionState, Endpoint, LinkEvent,
    LinkReport, testing::MockConnector,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Connect(&'static str),
    Disconnect,
    /// Report `Opened` from the n-th most recent link
    Opened(usize),
    /// Report `Closed` from the n-th most recent link
    Closed(usize),
    /// Report an error from the n-th most recent link
    Failed(usize),
    CreateSession,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        2 => prop::sample::select(vec!["alice", "bob", "carol"]).prop_map(Step::Connect),
        1 => Just(Step::Disconnect),
        3 => (0usize..3).prop_map(Step::Opened),
        3 => (0usize..3).prop_map(Step::Closed),
        1 => (0usize..3).prop_map(Step::Failed),
        1 => Just(Step::CreateSession),
    ]
}

fn nth_recent(mock: &MockConnector, n: usize) -> Option<inthedark_client::LinkId> {
    let opened = mock.opened();
    opened.len().checked_sub(n + 1).map(|i| opened[i])
}

#[test]
fn prop_links_never_overlap() {
    proptest!(|(steps in prop::collection::vec(step_strategy(), 0..60))| {
        let mock = MockConnector::new();
        let mut mgr = ConnectionManager::new(mock.clone(), Endpoint::default());

        let mut notices = Vec::new();
        for step in steps {
            let produced = match step {
                Step::Connect(user) => mgr.connect(user),
                Step::Disconnect => {
                    mgr.disconnect();
                    Vec::new()
                },
                Step::Opened(n) | Step::Closed(n) | Step::Failed(n) => {
                    let Some(link) = nth_recent(&mock, n) else { continue };
                    let event = match step {
                        Step::Opened(_) => LinkEvent::Opened,
                        Step::Closed(_) => LinkEvent::Closed,
                        _ => LinkEvent::Error(inthedark_client::TransportError::Stream("reset".into())),
                    };
                    mgr.handle_link_event(LinkReport::new(link, event))
                },
                Step::CreateSession => {
                    mgr.create_session();
                    Vec::new()
                },
            };
            notices.extend(produced);

            let closes = notices.iter().filter(|n| matches!(n, ConnectionNotice::Closed)).count();

            // PROPERTY: a link is only opened once every earlier link has closed
            prop_assert!(mock.opened().len() <= closes + 1);

            // PROPERTY: is_open agrees with the state
            prop_assert_eq!(mgr.is_open(), matches!(mgr.state(), ConnectionState::Open { .. }));
        }

        // PROPERTY: Opened and Closed notices alternate, starting with Opened
        // or a Closed for a link that never finished its handshake
        let mut open = false;
        for notice in &notices {
            match notice {
                ConnectionNotice::Opened { .. } => {
                    prop_assert!(!open, "two opens without a close between them");
                    open = true;
                },
                ConnectionNotice::Closed => open = false,
                _ => {},
            }
        }
    });
}

#[test]
fn prop_join_session_sends_only_valid_ids() {
    proptest!(|(session_id in "[A-Za-z0-9]{0,9}")| {
        let mock = MockConnector::new();
        let mut mgr = ConnectionManager::new(mock.clone(), Endpoint::default());
        mgr.connect("alice");

        let result = mgr.join_session(&session_id);

        if session_id.chars().count() == 5 {
            prop_assert!(result.is_ok());
            prop_assert_eq!(mock.sent_messages(), vec![ClientMessage::JoinSession { session_id }]);
        } else {
            prop_assert!(result.is_err());
            prop_assert!(mock.sent().is_empty());
        }
    });
}

#[test]
fn reconnect_waits_for_close_of_connecting_link() {
    let mock = MockConnector::new();
    let mut mgr = ConnectionManager::new(mock.clone(), Endpoint::default());

    mgr.connect("alice");
    let first = mock.last_opened().expect("first link");

    // Superseded before its handshake finished
    mgr.connect("bob");
    assert_eq!(mock.closed(), vec![first]);

    // Late handshake of the old link is not reported as an open
    assert!(mgr.handle_link_event(LinkReport::new(first, LinkEvent::Opened)).is_empty());

    let notices = mgr.handle_link_event(LinkReport::new(first, LinkEvent::Closed));
    assert_eq!(notices, vec![ConnectionNotice::Closed]);
    assert_eq!(mock.urls()[1].as_str(), "ws://localhost:8000/api/ws/bob");
}

#[test]
fn outgoing_senders_use_their_codes() {
    let mock = MockConnector::new();
    let mut mgr = ConnectionManager::new(mock.clone(), Endpoint::default());
    mgr.connect("alice");

    mgr.create_session();
    mgr.request_session();
    mgr.start_game();
    mgr.play(3);
    mgr.leave_session();

    assert_eq!(mock.sent_messages(), vec![
        ClientMessage::CreateSession,
        ClientMessage::SessionRequest,
        ClientMessage::StartGame,
        ClientMessage::Play { column: 3 },
        ClientMessage::LeaveSession,
    ]);
}
