//! Wire protocol for Trackline.
//!
//! This crate defines what the client and the game server say to each
//! other:
//!
//! - **Types** ([`ActionKind`], [`Route`], [`DestinationTicket`], etc.):
//!   the enums and board entities that appear in messages.
//! - **Messages** ([`Message`], [`TurnRequest`], [`TurnResponse`]): typed
//!   server lines, produced only by [`decode`].
//! - **Commands** ([`Command`]): client actions and their wire lines.
//! - **Errors** ([`ProtocolError`]): what can go wrong while decoding or
//!   parsing.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw lines) and the
//! dispatcher (routing). It knows nothing about connections or callbacks.
//!
//! ```text
//! Transport (lines) → Protocol (Message) → Dispatch (callbacks, listeners)
//! ```

mod command;
mod decode;
mod error;
mod message;
mod types;

pub use command::{CarSource, Command};
pub use decode::{decode, try_decode};
pub use error::ProtocolError;
pub use message::{
    BoardState, ClaimedDestinationTickets, ClaimedRoute, DrawnDestinationTickets,
    DrawnPassengerCar, FinalScore, Joined, Message, ResponsePayload, RouteList,
    TextMessage, TurnRequest, TurnResponse,
};
pub use types::{
    ActionKind, ClientType, Destination, DestinationTicket, ErrorCode, MessageType,
    PassengerCarColor, PlayerColor, Route,
};
