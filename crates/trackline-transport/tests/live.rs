//! Integration tests for the live TCP transport.
//!
//! Each test binds a throwaway server on `127.0.0.1:0` and drives the
//! transport against it, so real bytes cross a real socket.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use trackline_transport::{LiveTransport, Transport, TransportError, TransportMode};

async fn bind_server() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let port = listener.local_addr().expect("bound address").port();
    (listener, port)
}

#[tokio::test]
async fn test_live_transport_receives_lines_in_order() {
    let (listener, port) = bind_server().await;
    let mut transport = LiveTransport::new("127.0.0.1", port);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("should accept");
        socket
            .write_all(b"{\"type\":\"TextMessage\",\"text\":\"hi\"}\nsecond line\n")
            .await
            .expect("server write");
        socket
    });

    transport.connect(tx).await.expect("should connect");
    assert!(transport.is_connected());
    assert_eq!(transport.mode(), TransportMode::Live);

    let first = rx.recv().await.expect("first line");
    let second = rx.recv().await.expect("second line");
    assert_eq!(first, r#"{"type":"TextMessage","text":"hi"}"#);
    assert_eq!(second, "second line");

    let _socket = server.await.expect("server task");
    transport.close().await.expect("should close");
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_live_transport_send_appends_newline() {
    let (listener, port) = bind_server().await;
    let mut transport = LiveTransport::new("127.0.0.1", port);
    let (tx, _rx) = mpsc::unbounded_channel();

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.expect("should accept");
        let mut reader = BufReader::new(socket);
        let mut line = String::new();
        reader.read_line(&mut line).await.expect("server read");
        line
    });

    transport.connect(tx).await.expect("should connect");
    transport
        .send("Join alice Player")
        .await
        .expect("send should succeed");

    let received = server.await.expect("server task");
    assert_eq!(received, "Join alice Player\n");

    transport.close().await.expect("should close");
}

#[tokio::test]
async fn test_live_transport_connect_twice_is_rejected() {
    let (listener, port) = bind_server().await;
    let _server = tokio::spawn(async move { listener.accept().await });

    let mut transport = LiveTransport::new("127.0.0.1", port);
    let (tx, _rx) = mpsc::unbounded_channel();
    transport.connect(tx.clone()).await.expect("should connect");

    let second = transport.connect(tx).await;
    assert!(matches!(second, Err(TransportError::AlreadyConnected)));

    transport.close().await.expect("should close");
}

#[tokio::test]
async fn test_live_transport_connect_refused_returns_error() {
    // Grab a free port, then release it so nothing is listening there.
    let (listener, port) = bind_server().await;
    drop(listener);

    let mut transport = LiveTransport::new("127.0.0.1", port);
    let (tx, _rx) = mpsc::unbounded_channel();

    let result = transport.connect(tx).await;
    assert!(matches!(result, Err(TransportError::ConnectFailed(_))));
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_live_transport_close_twice_returns_not_connected() {
    let (listener, port) = bind_server().await;
    let _server = tokio::spawn(async move { listener.accept().await });

    let mut transport = LiveTransport::new("127.0.0.1", port);
    let (tx, _rx) = mpsc::unbounded_channel();
    transport.connect(tx).await.expect("should connect");

    transport.close().await.expect("first close");
    let second = transport.close().await;
    assert!(matches!(second, Err(TransportError::NotConnected)));
}

#[tokio::test]
async fn test_live_transport_send_without_connect_fails() {
    let mut transport = LiveTransport::new("127.0.0.1", 1);
    let result = transport.send("BoardState").await;
    assert!(matches!(result, Err(TransportError::NotConnected)));
}

#[tokio::test]
async fn test_live_transport_peer_close_stops_receiving() {
    let (listener, port) = bind_server().await;
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.expect("should accept");
        drop(socket);
    });

    let mut transport = LiveTransport::new("127.0.0.1", port);
    let (tx, mut rx) = mpsc::unbounded_channel();
    transport.connect(tx).await.expect("should connect");
    server.await.expect("server task");

    // The loop exits on EOF and drops its sender, closing the channel.
    let next = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("receive loop should finish");
    assert!(next.is_none());

    // The task is marked finished just after its sender drops.
    for _ in 0..100 {
        if !transport.is_receiving() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(!transport.is_receiving());
    assert!(transport.is_connected(), "stays connected until close()");

    transport.close().await.expect("close after EOF");
}
