//! Error types for the dispatch layer.

use trackline_protocol::{ActionKind, ProtocolError};
use trackline_transport::TransportError;

/// Errors returned when issuing actions or driving the dispatcher.
///
/// Missing handlers are not errors: an unroutable message pauses the
/// dispatcher and stays at the head of the queue.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// An action of this kind is still waiting for its response.
    #[error("a {0} action is already awaiting a response")]
    ActionPending(ActionKind),

    /// The dispatcher has been closed.
    #[error("dispatcher is closed")]
    Closed,

    /// The transport failed to connect, send, or close.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The command cannot be put on the wire.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
