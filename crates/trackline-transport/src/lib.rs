//! Transport abstraction layer for Trackline.
//!
//! Provides the [`Transport`] trait that abstracts over where server lines
//! come from, and two implementations:
//!
//! - [`LiveTransport`]: a TCP connection to a running game server
//! - [`ReplayTransport`]: a recorded session log played back line by line
//!
//! [`AnyTransport`] wraps both so the backend can be picked at runtime.
//!
//! Every transport runs its own receive loop on a Tokio task and pushes each
//! complete line into the [`LineSender`] registered at connect time.

#![allow(async_fn_in_trait)]

mod error;
mod live;
mod receiver;
mod replay;

pub use error::TransportError;
pub use live::{DEFAULT_PORT, LiveTransport};
pub use receiver::MAX_LINE_LENGTH;
pub use replay::{DEFAULT_REPLAY_DELAY, ReplayTransport};

use std::fmt;

use tokio::sync::mpsc;

/// Where received lines are delivered.
pub type LineSender = mpsc::UnboundedSender<String>;

/// Receiving end paired with a [`LineSender`].
pub type LineReceiver = mpsc::UnboundedReceiver<String>;

/// Which kind of source a transport reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportMode {
    /// A live server connection.
    Live,
    /// A recorded session log.
    Replay,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Live => write!(f, "live"),
            Self::Replay => write!(f, "replay"),
        }
    }
}

/// A bidirectional line stream to a data source.
pub trait Transport: Send + 'static {
    /// Opens the source and starts the receive loop.
    ///
    /// Every complete line read afterwards is sent to `lines`, in order,
    /// from the receive task.
    ///
    /// # Errors
    /// [`TransportError::ConnectFailed`] if the socket or file cannot be
    /// opened, [`TransportError::AlreadyConnected`] on a second call.
    async fn connect(&mut self, lines: LineSender) -> Result<(), TransportError>;

    /// Writes one line (a trailing newline is added).
    ///
    /// Transports without a write path log the line and return `Ok(())`.
    async fn send(&mut self, line: &str) -> Result<(), TransportError>;

    /// Stops the receive loop and releases the stream.
    ///
    /// Returns only after the receive task has exited.
    ///
    /// # Errors
    /// [`TransportError::NotConnected`] if the transport is not connected.
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Whether `connect` succeeded and `close` has not been called since.
    fn is_connected(&self) -> bool;

    /// Whether the receive loop is still reading. Turns `false` once the
    /// peer closes the stream or the log is exhausted.
    fn is_receiving(&self) -> bool;

    /// The kind of source behind this transport.
    fn mode(&self) -> TransportMode;
}

/// Either transport, chosen at runtime.
pub enum AnyTransport {
    /// TCP connection to a server.
    Live(LiveTransport),
    /// Session log playback.
    Replay(ReplayTransport),
}

impl From<LiveTransport> for AnyTransport {
    fn from(transport: LiveTransport) -> Self {
        Self::Live(transport)
    }
}

impl From<ReplayTransport> for AnyTransport {
    fn from(transport: ReplayTransport) -> Self {
        Self::Replay(transport)
    }
}

impl Transport for AnyTransport {
    async fn connect(&mut self, lines: LineSender) -> Result<(), TransportError> {
        match self {
            Self::Live(t) => t.connect(lines).await,
            Self::Replay(t) => t.connect(lines).await,
        }
    }

    async fn send(&mut self, line: &str) -> Result<(), TransportError> {
        match self {
            Self::Live(t) => t.send(line).await,
            Self::Replay(t) => t.send(line).await,
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        match self {
            Self::Live(t) => t.close().await,
            Self::Replay(t) => t.close().await,
        }
    }

    fn is_connected(&self) -> bool {
        match self {
            Self::Live(t) => t.is_connected(),
            Self::Replay(t) => t.is_connected(),
        }
    }

    fn is_receiving(&self) -> bool {
        match self {
            Self::Live(t) => t.is_receiving(),
            Self::Replay(t) => t.is_receiving(),
        }
    }

    fn mode(&self) -> TransportMode {
        match self {
            Self::Live(t) => t.mode(),
            Self::Replay(t) => t.mode(),
        }
    }
}
