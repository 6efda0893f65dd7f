//! Action dispatch for Trackline.
//!
//! The [`Dispatcher`] owns a transport and everything needed to talk to the
//! game server through it:
//!
//! - an inbound queue of decoded messages, filled from the transport's
//!   receive task through a channel,
//! - a pending table with one response callback slot per action kind,
//! - ordered listener lists for responses, turn requests, and text,
//! - a running/paused/closed state that gates routing.
//!
//! The caller drives it by calling [`Dispatcher::update`] from its own loop:
//!
//! ```ignore
//! let mut dispatcher = Dispatcher::new(transport);
//! dispatcher.connect().await?;
//! dispatcher.on_turn_request(|request| println!("{request}"));
//! dispatcher.get_board_state(Some(Box::new(|response| println!("{response}")))).await?;
//!
//! let mut ticker = tokio::time::interval(Duration::from_millis(50));
//! while dispatcher.update() {
//!     ticker.tick().await;
//! }
//! ```

mod dispatcher;
mod error;
mod listeners;
mod pending;
mod queue;
mod state;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use listeners::{Listener, ListenerId};
pub use pending::ResponseCallback;
pub use state::DispatchState;
