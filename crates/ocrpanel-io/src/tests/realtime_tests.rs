//! Realtime channel against an in-process Socket.IO speaking server

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use ocrpanel_core::RequestSink;
use ocrpanel_types::{AppEvent, ClientRequest, MacroStatus, ServerEvent};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::RealtimeChannel;

const OPEN: &str = r#"0{"sid":"s1","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#;

async fn next_event(rx: &kanal::AsyncReceiver<AppEvent>) -> ServerEvent {
    match timeout(Duration::from_secs(2), rx.recv()).await {
        Ok(Ok(AppEvent::Server(event))) => event,
        Ok(Ok(other)) => panic!("Wrong event type: {other:?}"),
        Ok(Err(e)) => panic!("Channel error: {e}"),
        Err(_) => panic!("Timeout waiting for server event"),
    }
}

#[tokio::test]
async fn test_handshake_events_and_requests() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();

        ws.send(Message::Text(OPEN.into())).await.unwrap();
        let join = ws.next().await.unwrap().unwrap();
        assert_eq!(join.to_text().unwrap(), "40");

        ws.send(Message::Text(r#"40{"sid":"n1"}"#.into())).await.unwrap();
        ws.send(Message::Text(r#"42["status_update",{"status":"running"}]"#.into()))
            .await
            .unwrap();
        ws.send(Message::Text(r#"42["not_ours",{}]"#.into())).await.unwrap();
        ws.send(Message::Text("2".into())).await.unwrap();

        let mut seen = Vec::new();
        while seen.len() < 2 {
            let message = ws.next().await.unwrap().unwrap();
            seen.push(message.to_text().unwrap().to_string());
        }
        seen
    });

    let (tx, rx) = kanal::unbounded_async::<AppEvent>();
    let (handle, channel) = RealtimeChannel::new(
        format!("ws://{addr}/socket.io/?EIO=4&transport=websocket"),
        Duration::from_millis(50),
        Duration::from_millis(200),
        tx,
    );
    let cancel = CancellationToken::new();
    let task = tokio::spawn(channel.run(cancel.child_token()));

    assert_eq!(next_event(&rx).await, ServerEvent::Connected);
    assert!(handle.is_connected());
    assert_eq!(
        next_event(&rx).await,
        ServerEvent::StatusUpdate {
            status: MacroStatus::Running
        }
    );

    assert!(handle.emit(ClientRequest::RequestScreenshot));

    let seen = timeout(Duration::from_secs(2), server).await.unwrap().unwrap();
    assert!(seen.contains(&"3".to_string()), "ping not answered: {seen:?}");
    assert!(seen.contains(&r#"42["request_screenshot"]"#.to_string()));

    cancel.cancel();
    timeout(Duration::from_secs(2), task).await.unwrap().unwrap().unwrap();
    assert!(!handle.is_connected());
}

#[tokio::test]
async fn test_server_drop_reports_disconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(Message::Text(OPEN.into())).await.unwrap();
        let _join = ws.next().await;
        ws.send(Message::Text("40".into())).await.unwrap();
        ws.send(Message::Text("41".into())).await.unwrap();
        // keep the listener alive long enough for the client to notice
        tokio::time::sleep(Duration::from_millis(200)).await;
    });

    let (tx, rx) = kanal::unbounded_async::<AppEvent>();
    let (handle, channel) = RealtimeChannel::new(
        format!("ws://{addr}/socket.io/?EIO=4&transport=websocket"),
        Duration::from_secs(5),
        Duration::from_secs(5),
        tx,
    );
    let cancel = CancellationToken::new();
    tokio::spawn(channel.run(cancel.child_token()));

    assert_eq!(next_event(&rx).await, ServerEvent::Connected);
    assert_eq!(next_event(&rx).await, ServerEvent::Disconnected);
    assert!(!handle.is_connected());
    assert!(!handle.emit(ClientRequest::RequestStatus));

    cancel.cancel();
}

#[tokio::test]
async fn test_reconnect_does_not_replay_requests_from_the_gap() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (release_tx, release_rx) = kanal::bounded_async::<()>(1);

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(Message::Text(OPEN.into())).await.unwrap();
        let _join = ws.next().await;
        ws.send(Message::Text("40".into())).await.unwrap();
        ws.send(Message::Text("41".into())).await.unwrap();
        drop(ws);

        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(Message::Text(OPEN.into())).await.unwrap();
        let join = ws.next().await.unwrap().unwrap();
        assert_eq!(join.to_text().unwrap(), "40");
        // hold the namespace ack until the client has tried to emit in the gap
        release_rx.recv().await.unwrap();
        ws.send(Message::Text("40".into())).await.unwrap();

        let mut seen = Vec::new();
        loop {
            let message = ws.next().await.unwrap().unwrap();
            let text = message.to_text().unwrap().to_string();
            let done = text == r#"42["request_status"]"#;
            seen.push(text);
            if done {
                break seen;
            }
        }
    });

    let (tx, rx) = kanal::unbounded_async::<AppEvent>();
    let (handle, channel) = RealtimeChannel::new(
        format!("ws://{addr}/socket.io/?EIO=4&transport=websocket"),
        Duration::from_millis(20),
        Duration::from_millis(20),
        tx,
    );
    let cancel = CancellationToken::new();
    tokio::spawn(channel.run(cancel.child_token()));

    assert_eq!(next_event(&rx).await, ServerEvent::Connected);
    assert_eq!(next_event(&rx).await, ServerEvent::Disconnected);
    assert!(!handle.emit(ClientRequest::RequestScreenshot));

    release_tx.send(()).await.unwrap();
    assert_eq!(next_event(&rx).await, ServerEvent::Connected);
    assert!(handle.emit(ClientRequest::RequestStatus));

    let seen = timeout(Duration::from_secs(2), server).await.unwrap().unwrap();
    assert_eq!(seen, vec![r#"42["request_status"]"#.to_string()]);

    cancel.cancel();
}

#[tokio::test]
async fn test_silent_server_times_out_despite_outbound_traffic() {
    const FAST_OPEN: &str =
        r#"0{"sid":"s2","upgrades":[],"pingInterval":100,"pingTimeout":100}"#;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(Message::Text(FAST_OPEN.into())).await.unwrap();
        let _join = ws.next().await;
        ws.send(Message::Text("40".into())).await.unwrap();
        // read everything, never answer
        while let Some(Ok(_)) = ws.next().await {}
    });

    let (tx, rx) = kanal::unbounded_async::<AppEvent>();
    let (handle, channel) = RealtimeChannel::new(
        format!("ws://{addr}/socket.io/?EIO=4&transport=websocket"),
        Duration::from_secs(5),
        Duration::from_secs(5),
        tx,
    );
    let cancel = CancellationToken::new();
    tokio::spawn(channel.run(cancel.child_token()));

    assert_eq!(next_event(&rx).await, ServerEvent::Connected);

    let emitter = {
        let handle = handle.clone();
        tokio::spawn(async move {
            while handle.emit(ClientRequest::RequestStatus) {
                tokio::time::sleep(Duration::from_millis(40)).await;
            }
        })
    };

    assert_eq!(next_event(&rx).await, ServerEvent::Disconnected);
    assert!(!handle.is_connected());
    timeout(Duration::from_secs(1), emitter).await.unwrap().unwrap();

    cancel.cancel();
}

#[tokio::test]
async fn test_unreachable_server_reports_connect_error() {
    // bind then drop to get a port nobody listens on
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let (tx, rx) = kanal::unbounded_async::<AppEvent>();
    let (handle, channel) = RealtimeChannel::new(
        format!("ws://{addr}/socket.io/?EIO=4&transport=websocket"),
        Duration::from_secs(5),
        Duration::from_secs(5),
        tx,
    );
    let cancel = CancellationToken::new();
    tokio::spawn(channel.run(cancel.child_token()));

    assert!(matches!(next_event(&rx).await, ServerEvent::ConnectError(_)));
    assert!(!handle.is_connected());

    cancel.cancel();
}
