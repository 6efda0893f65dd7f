//! Completion callbacks for in-flight actions, one slot per action kind.

use strum::EnumCount;
use trackline_protocol::{ActionKind, TurnResponse};

/// Runs once with the response to an issued action.
pub type ResponseCallback = Box<dyn FnOnce(TurnResponse) + Send>;

/// At most one outstanding callback per [`ActionKind`].
pub(crate) struct PendingActions {
    slots: [Option<ResponseCallback>; ActionKind::COUNT],
}

impl PendingActions {
    pub(crate) fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub(crate) fn is_pending(&self, kind: ActionKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Fills the slot for `kind`. Returns the callback back if the slot is
    /// already taken; the existing callback is left in place.
    pub(crate) fn register(
        &mut self,
        kind: ActionKind,
        callback: ResponseCallback,
    ) -> Result<(), ResponseCallback> {
        let slot = &mut self.slots[kind.index()];
        if slot.is_some() {
            return Err(callback);
        }
        *slot = Some(callback);
        Ok(())
    }

    /// Empties the slot for `kind`, returning its callback.
    pub(crate) fn take(&mut self, kind: ActionKind) -> Option<ResponseCallback> {
        self.slots[kind.index()].take()
    }

    /// Drops every callback. Returns how many were waiting.
    pub(crate) fn clear(&mut self) -> usize {
        self.slots
            .iter_mut()
            .filter_map(Option::take)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn join_response() -> TurnResponse {
        match trackline_protocol::decode(
            r#"{"type":"Info","turnType":"Join","success":true,"playerName":"a","clientType":"Player"}"#,
        ) {
            trackline_protocol::Message::Response(response) => response,
            other => panic!("expected a response, got {other:?}"),
        }
    }

    fn noop() -> ResponseCallback {
        Box::new(|_| {})
    }

    #[test]
    fn test_register_and_take() {
        let mut pending = PendingActions::new();
        assert!(!pending.is_pending(ActionKind::BoardState));

        assert!(pending.register(ActionKind::BoardState, noop()).is_ok());
        assert!(pending.is_pending(ActionKind::BoardState));
        assert!(!pending.is_pending(ActionKind::ClaimRoute));

        assert!(pending.take(ActionKind::BoardState).is_some());
        assert!(!pending.is_pending(ActionKind::BoardState));
        assert!(pending.take(ActionKind::BoardState).is_none());
    }

    #[test]
    fn test_second_registration_is_rejected_and_first_kept() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut pending = PendingActions::new();

        let first = Arc::clone(&calls);
        let registered = pending.register(ActionKind::Join, Box::new(move |_| {
            first.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(registered.is_ok());
        let second = Arc::clone(&calls);
        let rejected = pending.register(ActionKind::Join, Box::new(move |_| {
            second.fetch_add(100, Ordering::SeqCst);
        }));
        assert!(rejected.is_err());

        // Only the first callback is still in the slot.
        let kept = pending.take(ActionKind::Join).unwrap();
        kept(join_response());
        assert!(!pending.is_pending(ActionKind::Join));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_counts_dropped_callbacks() {
        let mut pending = PendingActions::new();
        assert!(pending.register(ActionKind::Join, noop()).is_ok());
        assert!(pending.register(ActionKind::ListAllRoutes, noop()).is_ok());

        assert_eq!(pending.clear(), 2);
        assert_eq!(pending.clear(), 0);
        assert!(!pending.is_pending(ActionKind::ListAllRoutes));
    }
}
