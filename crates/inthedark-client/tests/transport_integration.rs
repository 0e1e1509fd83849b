//! Integration tests for the WebSocket transport.
//!
//! A real tokio-tungstenite server on a loopback port plays the game server;
//! the client side is the [`ConnectionManager`] driven by link reports from
//! [`WsConnector`].

#![cfg(feature = "transport")]

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use inthedark_client::{
    ClientMessage, ConnectionManager, ConnectionNotice, Endpoint, LinkReport, ServerMessage,
    transport::WsConnector,
};
use tokio::{net::TcpListener, sync::mpsc, time::timeout};
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// Bind a loopback listener and return it with its `host:port`.
async fn listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    (listener, addr)
}

/// Feed reports into the manager until it produces at least one notice.
async fn next_notices(
    mgr: &mut ConnectionManager<WsConnector>,
    reports: &mut mpsc::UnboundedReceiver<LinkReport>,
) -> Vec<ConnectionNotice> {
    loop {
        let report = timeout(Duration::from_secs(5), reports.recv())
            .await
            .expect("timed out waiting for link report")
            .expect("report channel closed");
        let notices = mgr.handle_link_event(report);
        if !notices.is_empty() {
            return notices;
        }
    }
}

#[tokio::test]
async fn round_trip_through_real_socket() {
    let (listener, addr) = listener().await;

    // Echo server: answers every CreateSession with a ClientJoined
    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();
        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                let request = ClientMessage::decode(text.as_str()).unwrap();
                assert_eq!(request, ClientMessage::CreateSession);
                let reply = r#"{"event_code":1,"data":{"session_id":"ABCDE","client_id":"alice","session_client_ids":["alice"]}}"#;
                ws.send(Message::text(reply)).await.unwrap();
            }
        }
    });

    let (connector, mut reports) = WsConnector::new();
    let mut mgr = ConnectionManager::new(connector, Endpoint::new(addr, "api/ws", false));

    assert!(mgr.connect("alice").is_empty());
    let notices = next_notices(&mut mgr, &mut reports).await;
    assert_eq!(notices, vec![ConnectionNotice::Opened { user_id: "alice".to_string() }]);
    assert!(mgr.is_open());

    mgr.create_session();
    let notices = next_notices(&mut mgr, &mut reports).await;
    assert!(matches!(
        notices.as_slice(),
        [ConnectionNotice::Message(ServerMessage::ClientJoined(m))] if m.client_id == "alice"
    ));

    mgr.disconnect();
    let notices = next_notices(&mut mgr, &mut reports).await;
    assert_eq!(notices, vec![ConnectionNotice::Closed]);
}

#[tokio::test]
async fn refused_connection_reports_error_then_close() {
    // Bind then drop so the port is very likely closed
    let (listener, addr) = listener().await;
    drop(listener);

    let (connector, mut reports) = WsConnector::new();
    let mut mgr = ConnectionManager::new(connector, Endpoint::new(addr, "api/ws", false));
    mgr.connect("alice");

    let notices = next_notices(&mut mgr, &mut reports).await;
    assert!(matches!(notices.as_slice(), [ConnectionNotice::Error(_)]));
    let notices = next_notices(&mut mgr, &mut reports).await;
    assert_eq!(notices, vec![ConnectionNotice::Closed]);
    assert!(!mgr.is_open());
}
