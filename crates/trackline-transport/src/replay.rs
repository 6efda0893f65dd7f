//! Replay transport: plays back a recorded session log.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs::File;

use crate::receiver::ReceiveLoop;
use crate::{LineSender, Transport, TransportError, TransportMode};

/// Pause between replayed lines when none is configured.
pub const DEFAULT_REPLAY_DELAY: Duration = Duration::from_secs(1);

/// A [`Transport`] that emits the lines of a log file in order.
///
/// Useful for deterministic offline runs: every line the server sent
/// during a recorded session is replayed, optionally paced by a fixed
/// delay. There is no write path; outbound lines are logged and dropped.
pub struct ReplayTransport {
    path: PathBuf,
    delay: Duration,
    receiver: Option<ReceiveLoop>,
}

impl ReplayTransport {
    /// Creates a replay of the log at `path` with [`DEFAULT_REPLAY_DELAY`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delay: DEFAULT_REPLAY_DELAY,
            receiver: None,
        }
    }

    /// Sets the pause after each replayed line. Zero replays at full speed.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// The log file being replayed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The per-line delay.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Transport for ReplayTransport {
    async fn connect(&mut self, lines: LineSender) -> Result<(), TransportError> {
        if self.receiver.is_some() {
            tracing::error!(path = %self.path.display(), "client is already connected");
            return Err(TransportError::AlreadyConnected);
        }

        let file = File::open(&self.path).await.map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "cannot open session log");
            TransportError::ConnectFailed(e)
        })?;

        let source = self.path.display().to_string();
        self.receiver = Some(ReceiveLoop::spawn(file, lines, self.delay, source));

        tracing::info!(
            path = %self.path.display(),
            delay_ms = self.delay.as_millis() as u64,
            "replaying session log"
        );
        Ok(())
    }

    async fn send(&mut self, line: &str) -> Result<(), TransportError> {
        tracing::error!(line, "sending is not supported while replaying a log");
        Ok(())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        let Some(receiver) = self.receiver.take() else {
            return Err(TransportError::NotConnected);
        };
        receiver.stop().await?;

        tracing::info!(path = %self.path.display(), "replay successfully closed");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.receiver.is_some()
    }

    fn is_receiving(&self) -> bool {
        self.receiver.as_ref().is_some_and(ReceiveLoop::is_running)
    }

    fn mode(&self) -> TransportMode {
        TransportMode::Replay
    }
}
