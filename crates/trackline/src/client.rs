//! Client builder.
//!
//! This is the usual entry point: pick a source, build, and get back a
//! connected dispatcher.

use std::time::Duration;

use trackline_dispatch::Dispatcher;
use trackline_transport::AnyTransport;

use crate::config::{ClientConfig, ClientMode};
use crate::TracklineError;

/// Builder for a connected [`Dispatcher`].
///
/// # Example
///
/// ```rust,ignore
/// use trackline::prelude::*;
///
/// let mut client = Client::builder()
///     .replay("sessions/game-42.log")
///     .replay_delay(Duration::ZERO)
///     .build()
///     .await?;
/// while client.update() { /* ... */ }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Creates a builder for the default live server (`localhost:8080`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects to a live server at `host:port`.
    pub fn live(mut self, host: impl Into<String>, port: u16) -> Self {
        self.config.mode = ClientMode::Live;
        self.config.address = host.into();
        self.config.port = port;
        self
    }

    /// Replays the session log at `path`.
    pub fn replay(mut self, path: impl Into<String>) -> Self {
        self.config.mode = ClientMode::Log;
        self.config.address = path.into();
        self
    }

    /// Sets the pause between replayed lines.
    pub fn replay_delay(mut self, delay: Duration) -> Self {
        self.config.replay_delay = delay;
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// The configuration [`build`](Self::build) will use.
    pub fn current_config(&self) -> &ClientConfig {
        &self.config
    }

    /// Validates the configuration, then creates and connects the
    /// dispatcher.
    pub async fn build(self) -> Result<Dispatcher<AnyTransport>, TracklineError> {
        self.config.validate()?;

        let mut dispatcher = Dispatcher::new(self.config.transport());
        dispatcher.connect().await?;

        tracing::info!(
            mode = ?self.config.mode,
            address = %self.config.address,
            "trackline client ready"
        );
        Ok(dispatcher)
    }
}

/// Entry point for building clients.
pub struct Client;

impl Client {
    /// Creates a new builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}
