//! The receive loop shared by every transport.
//!
//! A transport hands its read half to [`ReceiveLoop::spawn`], which frames
//! the bytes into lines and forwards each one to the registered
//! [`LineSender`]. The loop owns the reader, so stopping the loop is what
//! releases the underlying socket or file.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio::task::JoinHandle;
use tokio_util::bytes::BytesMut;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, Decoder, FramedRead};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{LineSender, TransportError};

/// Longest line the framer keeps. Longer lines are skipped with a warning.
pub const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Newline framing that never ends the stream on bad input.
///
/// Invalid UTF-8 is replaced lossily and over-long lines are dropped, so a
/// single malformed line cannot stop the lines after it.
struct LineFramer {
    inner: AnyDelimiterCodec,
}

impl LineFramer {
    fn new(max_length: usize) -> Self {
        Self {
            inner: AnyDelimiterCodec::new_with_max_length(
                b"\n".to_vec(),
                b"\n".to_vec(),
                max_length,
            ),
        }
    }

    fn frame(
        &mut self,
        buf: &mut BytesMut,
        eof: bool,
    ) -> Result<Option<String>, AnyDelimiterCodecError> {
        loop {
            let chunk = if eof {
                self.inner.decode_eof(buf)
            } else {
                self.inner.decode(buf)
            };
            match chunk {
                Ok(chunk) => return Ok(chunk.map(|bytes| to_line(&bytes))),
                Err(AnyDelimiterCodecError::MaxChunkLengthExceeded) => {
                    warn!(max = MAX_LINE_LENGTH, "skipping over-long line");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Decoder for LineFramer {
    type Item = String;
    type Error = AnyDelimiterCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, Self::Error> {
        self.frame(buf, false)
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, Self::Error> {
        self.frame(buf, true)
    }
}

fn to_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Handle to a running receive task.
pub(crate) struct ReceiveLoop {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ReceiveLoop {
    /// Spawns the loop on the current Tokio runtime.
    ///
    /// `pace` is slept after every emitted line; `Duration::ZERO` emits
    /// lines back to back.
    pub(crate) fn spawn<R>(
        reader: R,
        lines: LineSender,
        pace: Duration,
        source: String,
    ) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let handle =
            tokio::spawn(run(reader, lines, pace, source, cancel.clone()));
        Self { cancel, handle }
    }

    /// Whether the task is still reading.
    pub(crate) fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Signals the loop to stop and waits until it has exited.
    pub(crate) async fn stop(self) -> Result<(), TransportError> {
        self.cancel.cancel();
        self.handle
            .await
            .map_err(|e| TransportError::ReceiveLoop(e.to_string()))
    }
}

async fn run<R>(
    reader: R,
    lines: LineSender,
    pace: Duration,
    source: String,
    cancel: CancellationToken,
) where
    R: AsyncRead + Unpin,
{
    let mut frames = FramedRead::new(reader, LineFramer::new(MAX_LINE_LENGTH));
    let mut received: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(%source, received, "receive loop cancelled");
                return;
            }
            next = frames.next() => next,
        };

        match next {
            Some(Ok(line)) => {
                received += 1;
                if lines.send(line).is_err() {
                    debug!(%source, "line receiver dropped, stopping receive loop");
                    return;
                }
            }
            // Only read errors reach here; bad lines are handled by the framer.
            Some(Err(e)) => {
                warn!(%source, error = %e, "receive failed");
                return;
            }
            None => {
                info!(%source, received, "stream closed");
                return;
            }
        }

        if !pace.is_zero() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(%source, received, "receive loop cancelled");
                    return;
                }
                _ = tokio::time::sleep(pace) => {}
            }
        }
    }
}
