//! Unified error type for Trackline.

use trackline_dispatch::DispatchError;
use trackline_protocol::ProtocolError;
use trackline_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `trackline` facade you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant lets `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum TracklineError {
    /// A transport-level error (connect, send, close).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (decode, invalid command).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A dispatch-level error (pending action, closed dispatcher).
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The client configuration cannot be used.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The tracing subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
