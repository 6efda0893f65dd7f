//! Live TCP transport.

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;

use crate::receiver::ReceiveLoop;
use crate::{LineSender, Transport, TransportError, TransportMode};

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 8080;

/// A [`Transport`] backed by a TCP connection to a game server.
///
/// The socket is split on connect: the read half goes to the receive
/// loop, the write half stays here for [`send`](Transport::send).
pub struct LiveTransport {
    host: String,
    port: u16,
    writer: Option<OwnedWriteHalf>,
    receiver: Option<ReceiveLoop>,
}

impl LiveTransport {
    /// Creates an unconnected transport for `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            writer: None,
            receiver: None,
        }
    }

    /// The configured server host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The configured server port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Transport for LiveTransport {
    async fn connect(&mut self, lines: LineSender) -> Result<(), TransportError> {
        if self.receiver.is_some() {
            tracing::error!(host = %self.host, port = self.port, "client is already connected");
            return Err(TransportError::AlreadyConnected);
        }

        tracing::info!(host = %self.host, port = self.port, "opening connection");
        let stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| {
                tracing::error!(host = %self.host, port = self.port, error = %e, "connect failed");
                TransportError::ConnectFailed(e)
            })?;

        let (read, write) = stream.into_split();
        let source = format!("{}:{}", self.host, self.port);
        self.receiver =
            Some(ReceiveLoop::spawn(read, lines, Duration::ZERO, source));
        self.writer = Some(write);

        tracing::info!(host = %self.host, port = self.port, "connected");
        Ok(())
    }

    async fn send(&mut self, line: &str) -> Result<(), TransportError> {
        let Some(writer) = self.writer.as_mut() else {
            tracing::error!(line, "not connected, dropping outbound line");
            return Err(TransportError::NotConnected);
        };

        let mut framed = String::with_capacity(line.len() + 1);
        framed.push_str(line);
        framed.push('\n');

        writer
            .write_all(framed.as_bytes())
            .await
            .map_err(TransportError::SendFailed)?;
        writer.flush().await.map_err(TransportError::SendFailed)?;

        tracing::trace!(line, "sent");
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        let Some(receiver) = self.receiver.take() else {
            return Err(TransportError::NotConnected);
        };

        if let Some(mut writer) = self.writer.take() {
            // The peer may already be gone; the read side still has to stop.
            if let Err(e) = writer.shutdown().await {
                tracing::debug!(error = %e, "write half shutdown failed");
            }
        }
        receiver.stop().await?;

        tracing::info!(host = %self.host, port = self.port, "connection successfully closed");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.receiver.is_some()
    }

    fn is_receiving(&self) -> bool {
        self.receiver.as_ref().is_some_and(ReceiveLoop::is_running)
    }

    fn mode(&self) -> TransportMode {
        TransportMode::Live
    }
}
