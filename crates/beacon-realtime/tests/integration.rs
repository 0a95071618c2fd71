//! End-to-end transport tests over a real local WebSocket server.
//!
//! The unit tests drive the manager with scripted in-memory transports;
//! these exercise the actual `tokio-tungstenite` path: upgrade, text
//! frames, server-initiated close, and reconnection against a live
//! listener.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

use beacon_realtime::{ConnectionManager, ConnectionState, PushTransport, WebSocketTransport};

/// Serve WebSocket connections; on each, send `frames` and then either
/// close or hold the connection open. Returns the `ws://` URL and a
/// counter of accepted connections.
async fn spawn_server(frames: Vec<String>, close_after_send: bool) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = connections.clone();

    drop(tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let _ = counter.fetch_add(1, Ordering::SeqCst);
            let frames = frames.clone();
            drop(tokio::spawn(async move {
                let Ok(mut ws) = accept_async(stream).await else {
                    return;
                };
                for frame in &frames {
                    if ws.send(Message::Text(frame.clone().into())).await.is_err() {
                        return;
                    }
                }
                if close_after_send {
                    let _ = ws.close(None).await;
                } else {
                    // Hold the connection until the client goes away.
                    while ws.next().await.is_some() {}
                }
            }));
        }
    }));

    (format!("ws://{addr}"), connections)
}

#[tokio::test]
async fn transport_delivers_text_frames_verbatim() {
    let (url, _connections) = spawn_server(
        vec![
            r#"{"type":"general","id":1}"#.to_owned(),
            "second frame".to_owned(),
        ],
        false,
    )
    .await;

    let transport = WebSocketTransport::new(url);
    let mut rx = transport.connect().await.unwrap();

    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first, r#"{"type":"general","id":1}"#);

    let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(second, "second frame");
}

#[tokio::test]
async fn server_close_ends_the_receiver() {
    let (url, _connections) = spawn_server(vec!["only frame".to_owned()], true).await;

    let transport = WebSocketTransport::new(url);
    let mut rx = transport.connect().await.unwrap();

    let frame = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap();
    assert_eq!(frame.as_deref(), Some("only frame"));

    let end = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap();
    assert_eq!(end, None, "close must surface as the end of the stream");
}

#[tokio::test]
async fn manager_reconnects_through_real_server_closes() {
    let (url, connections) =
        spawn_server(vec![r#"{"type":"general","id":1}"#.to_owned()], true).await;

    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    let transport = Arc::new(WebSocketTransport::new(url));
    let manager = ConnectionManager::new(transport, Duration::from_millis(100));
    let handle = manager.start(move |frame| sink.lock().push(frame));

    // Each connection delivers one frame and closes; the flat delay
    // brings the channel back. Wait for at least two full cycles.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while received.lock().len() < 2 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    assert!(
        connections.load(Ordering::SeqCst) >= 2,
        "the manager should have reconnected"
    );
    assert!(received.lock().len() >= 2);

    handle.stop();
    assert_eq!(handle.state(), ConnectionState::Closed);

    // After stop (and once any in-flight attempt drains), no further
    // connections appear.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let settled = connections.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(connections.load(Ordering::SeqCst), settled);
}
