//! Ordered listener lists.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for listener IDs. Starts at 1.
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned when a listener is registered, used to unsubscribe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// A listener for messages of type `T`.
pub type Listener<T> = Box<dyn FnMut(&T) + Send>;

/// Listeners for one message type, called in registration order.
pub(crate) struct Listeners<T> {
    entries: Vec<(ListenerId, Listener<T>)>,
}

impl<T> Listeners<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, listener: Listener<T>) -> ListenerId {
        let id = ListenerId::next();
        self.entries.push((id, listener));
        id
    }

    /// Removes the listener with `id`. Returns `false` if it is not here.
    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn notify(&mut self, message: &T) {
        for (_, listener) in &mut self.entries {
            listener(message);
        }
    }
}
