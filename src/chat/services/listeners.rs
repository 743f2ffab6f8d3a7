//! Listener registry and isolated fan-out.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::chat::{
    domain::{ChatMessage, SubscriptionId},
    ports::listener::MessageListener,
};

/// Outcome of one fan-out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanOutReport {
    /// Number of listeners called.
    pub invoked: usize,
    /// Number of listeners that returned an error or panicked.
    pub failed: usize,
}

impl FanOutReport {
    /// Returns `true` if every invoked listener succeeded.
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Clone)]
pub(crate) struct Registration {
    id: SubscriptionId,
    listener: Arc<dyn MessageListener>,
}

/// Ordered set of registered listeners.
///
/// Each registration gets its own [`SubscriptionId`]. Unregistering removes
/// the listener by identity: every registration sharing the same `Arc`
/// allocation goes away together.
#[derive(Default)]
pub struct ListenerRegistry {
    entries: Vec<Registration>,
}

impl ListenerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener and returns its subscription handle.
    pub fn register(&mut self, listener: Arc<dyn MessageListener>) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.entries.push(Registration { id, listener });
        id
    }

    /// Removes the listener behind `id`, including any duplicate
    /// registrations of the same listener.
    ///
    /// Returns `false` if `id` is unknown.
    pub fn unregister(&mut self, id: SubscriptionId) -> bool {
        let Some(target) = self
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| Arc::clone(&entry.listener))
        else {
            return false;
        };
        self.entries
            .retain(|entry| !Arc::ptr_eq(&entry.listener, &target));
        true
    }

    /// Returns the number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every registration.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn snapshot(&self) -> Vec<Registration> {
        self.entries.clone()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.id))
            .finish()
    }
}

/// Calls every registration in order, isolating failures.
///
/// Errors are logged at `warn`, panics at `error`; neither stops the loop.
pub(crate) fn deliver(registrations: &[Registration], batch: &[ChatMessage]) -> FanOutReport {
    let mut report = FanOutReport::default();
    if batch.is_empty() {
        return report;
    }

    for Registration { id, listener } in registrations {
        report.invoked += 1;
        match panic::catch_unwind(AssertUnwindSafe(|| listener.on_new_messages(batch))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                report.failed += 1;
                warn!(subscription = %id, error = %err, "message listener failed");
            }
            Err(_) => {
                report.failed += 1;
                error!(subscription = %id, "message listener panicked");
            }
        }
    }
    report
}
