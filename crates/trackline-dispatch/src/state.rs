//! Dispatcher flow-control state.

use std::fmt;

use tokio::time::Instant;

/// Whether the dispatcher routes messages on [`update`](crate::Dispatcher::update).
///
/// `Running` and `Paused` can be switched freely. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// One message is routed per tick.
    Running,
    /// Nothing is routed. With a deadline, the dispatcher resumes on the
    /// first tick at or after it. Without one, it waits for
    /// [`resume`](crate::Dispatcher::resume).
    Paused { until: Option<Instant> },
    /// The dispatcher was closed and routes nothing ever again.
    Closed,
}

impl DispatchState {
    pub fn is_paused(self) -> bool {
        matches!(self, Self::Paused { .. })
    }

    pub fn is_closed(self) -> bool {
        self == Self::Closed
    }

    /// Whether a timed pause has run out at `now`.
    pub(crate) fn pause_expired(self, now: Instant) -> bool {
        matches!(self, Self::Paused { until: Some(deadline) } if now >= deadline)
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Paused { until: None } => write!(f, "paused"),
            Self::Paused { until: Some(_) } => write!(f, "paused (timed)"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_state_predicates() {
        assert!(!DispatchState::Running.is_paused());
        assert!(DispatchState::Paused { until: None }.is_paused());
        assert!(DispatchState::Closed.is_closed());
        assert!(!DispatchState::Paused { until: None }.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_expires_at_deadline() {
        let now = Instant::now();
        let state = DispatchState::Paused {
            until: Some(now + Duration::from_secs(2)),
        };
        assert!(!state.pause_expired(now));
        assert!(!state.pause_expired(now + Duration::from_millis(1999)));
        assert!(state.pause_expired(now + Duration::from_secs(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_indefinite_pause_never_expires() {
        let state = DispatchState::Paused { until: None };
        assert!(!state.pause_expired(Instant::now() + Duration::from_secs(3600)));
        assert!(!DispatchState::Running.pause_expired(Instant::now()));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(DispatchState::Running.to_string(), "running");
        assert_eq!(DispatchState::Paused { until: None }.to_string(), "paused");
        assert_eq!(DispatchState::Closed.to_string(), "closed");
    }
}
