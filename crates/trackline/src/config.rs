//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use trackline_transport::{
    AnyTransport, DEFAULT_PORT, DEFAULT_REPLAY_DELAY, LiveTransport, ReplayTransport,
};

use crate::TracklineError;

/// Where the client's server lines come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientMode {
    /// Connect to a running server.
    #[default]
    Live,
    /// Replay a recorded session log.
    Log,
}

/// Everything needed to build a client's transport.
///
/// Missing fields take their defaults when deserialized, so a config file
/// only has to name what differs:
///
/// ```json
/// { "mode": "Log", "address": "sessions/game-42.log" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub mode: ClientMode,
    /// Server host in live mode, log file path in log mode.
    pub address: String,
    /// Server port. Ignored in log mode.
    pub port: u16,
    /// Pause between replayed lines. Ignored in live mode.
    pub replay_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            mode: ClientMode::Live,
            address: "localhost".to_string(),
            port: DEFAULT_PORT,
            replay_delay: DEFAULT_REPLAY_DELAY,
        }
    }
}

impl ClientConfig {
    /// A live config for `host:port`.
    pub fn live(host: impl Into<String>, port: u16) -> Self {
        Self {
            mode: ClientMode::Live,
            address: host.into(),
            port,
            ..Default::default()
        }
    }

    /// A replay config for the log at `path`.
    pub fn replay(path: impl Into<String>) -> Self {
        Self {
            mode: ClientMode::Log,
            address: path.into(),
            ..Default::default()
        }
    }

    /// Checks that the config names a usable source.
    ///
    /// # Errors
    /// [`TracklineError::Config`] if the address is empty, or the port is
    /// zero in live mode.
    pub fn validate(&self) -> Result<(), TracklineError> {
        if self.address.trim().is_empty() {
            return Err(TracklineError::Config("address must not be empty".into()));
        }
        if self.mode == ClientMode::Live && self.port == 0 {
            return Err(TracklineError::Config("port must not be 0".into()));
        }
        Ok(())
    }

    /// Builds the transport this config describes. It is not connected yet.
    pub fn transport(&self) -> AnyTransport {
        match self.mode {
            ClientMode::Live => LiveTransport::new(self.address.clone(), self.port).into(),
            ClientMode::Log => ReplayTransport::new(PathBuf::from(&self.address))
                .with_delay(self.replay_delay)
                .into(),
        }
    }
}
