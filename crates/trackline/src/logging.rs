//! Tracing subscriber setup.

use std::io;

use tracing_subscriber::EnvFilter;

use crate::TracklineError;

/// Installs a global `fmt` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence when set; otherwise `default_directive`
/// (e.g. `"info"` or `"trackline_dispatch=debug"`) selects what is shown.
///
/// # Errors
/// [`TracklineError::Logging`] if the directive does not parse or a global
/// subscriber is already installed.
pub fn init(default_directive: &str) -> Result<(), TracklineError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|error| TracklineError::Logging(error.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| TracklineError::Logging(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_existing_subscriber() {
        // The first call may install the subscriber; the second never can.
        let _ = init("info");
        assert!(matches!(init("info"), Err(TracklineError::Logging(_))));
    }
}
