//! # Trackline
//!
//! Client-side protocol engine for turn-based railway game servers.
//!
//! Trackline connects to a game server over TCP, or replays a recorded
//! session log, decodes the server's line-delimited JSON into typed
//! messages, and hands them to your callbacks and listeners one tick at a
//! time. Each action kind can have at most one outstanding callback.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use trackline::prelude::*;
//!
//! # async fn run() -> Result<(), TracklineError> {
//! let mut client = Client::builder().live("localhost", 8080).build().await?;
//!
//! client.on_turn_request(|request| println!("{request}"));
//! client
//!     .join_game("alice", ClientType::Player, PlayerColor::None, None)
//!     .await?;
//!
//! let mut ticker = tokio::time::interval(std::time::Duration::from_millis(50));
//! while client.update() {
//!     ticker.tick().await;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! - [`transport`]: live and replay line sources
//! - [`protocol`]: message model, decoder, and commands
//! - [`dispatch`]: the dispatcher

mod client;
mod config;
mod error;
pub mod logging;

pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientMode};
pub use error::TracklineError;

pub use trackline_dispatch as dispatch;
pub use trackline_protocol as protocol;
pub use trackline_transport as transport;

/// The types most clients need.
pub mod prelude {
    pub use crate::{Client, ClientBuilder, ClientConfig, ClientMode, TracklineError};
    pub use trackline_dispatch::{
        DispatchError, DispatchState, Dispatcher, ListenerId, ResponseCallback,
    };
    pub use trackline_protocol::{
        ActionKind, ClientType, Command, Destination, DestinationTicket, ErrorCode, Message,
        PassengerCarColor, PlayerColor, ResponsePayload, Route, TextMessage, TurnRequest,
        TurnResponse,
    };
    pub use trackline_transport::{AnyTransport, Transport};
}
