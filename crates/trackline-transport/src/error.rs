/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Opening the socket or log file failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// `connect` was called on a transport that is already connected.
    #[error("transport is already connected")]
    AlreadyConnected,

    /// The operation needs a connection, but none is open.
    #[error("transport is not connected")]
    NotConnected,

    /// Writing a line to the peer failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// The receive loop did not shut down cleanly (it panicked or was
    /// aborted by the runtime).
    #[error("receive loop terminated abnormally: {0}")]
    ReceiveLoop(String),
}
