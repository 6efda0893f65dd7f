//! Error types for the protocol layer.
//!
//! The decoder never lets these escape [`decode`](crate::decode): a line
//! that fails strict decoding becomes a text message. They surface from
//! [`try_decode`](crate::try_decode) and from command parsing/validation.

/// Errors that can occur while decoding server lines or handling commands.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The line is not JSON, or a field has the wrong shape or an unknown
    /// enum name.
    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    /// A field with no default is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    /// The `type` tag names no known message type.
    #[error("unknown message type `{0}`")]
    UnknownMessageType(String),

    /// An outbound command line could not be parsed.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// A command's arguments cannot be put on the wire, e.g. a player
    /// name containing whitespace.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
