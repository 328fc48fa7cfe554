//! Structural-change notifications.
//!
//! Listeners are invoked synchronously, before the mutating call returns,
//! so callers can rely on downstream propagation having started.

use std::sync::{Mutex, PoisonError};

use crate::resource::MemberId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceEvent {
    /// A member was renamed within its folder; `old_path` is the book path
    /// it held before the rename.
    Renamed { id: MemberId, old_path: String },
    /// A member was moved to a new book path.
    Moved { id: MemberId, old_path: String },
    /// A member's file was deleted.
    Deleted { id: MemberId, old_path: String },
    /// An external write to the member's file settled and the member
    /// should be reloaded.
    UpdatedFromDisk { id: MemberId },
    /// Raised exactly once per successful batch with at least one applied
    /// change.
    BookContentModified,
    /// An in-place edit of a member's name was committed, whether or not
    /// the rename itself was accepted.
    RenameAttempted { id: MemberId },
}

type Listener = Box<dyn Fn(&ResourceEvent) + Send + Sync>;

/// Registry of event listeners with synchronous delivery.
///
/// Listeners must not subscribe from inside a callback.
#[derive(Default)]
pub struct EventBus {
    listeners: Mutex<Vec<Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&ResourceEvent) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        listeners.push(Box::new(listener));
    }

    pub fn emit(&self, event: &ResourceEvent) {
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(event);
        }
    }
}
