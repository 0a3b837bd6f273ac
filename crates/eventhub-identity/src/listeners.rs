//! Session-change listener registry shared by providers

use eventhub_api::Identity;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{SessionListener, Unsubscribe};

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, SessionListener)>,
}

/// Set of registered session listeners.
///
/// Cloning shares the same registry.
#[derive(Clone, Default)]
pub struct ListenerSet {
    inner: Arc<Mutex<Registry>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a listener; the returned handle removes it again
    pub fn register(&self, listener: SessionListener) -> Unsubscribe {
        let id = {
            let mut registry = self.registry();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.push((id, listener));
            id
        };

        let set = self.clone();
        Unsubscribe::new(move || set.remove(id))
    }

    fn remove(&self, id: u64) {
        let mut registry = self.registry();
        registry.listeners.retain(|(listener_id, _)| *listener_id != id);
        tracing::debug!(listener_id = id, remaining = registry.listeners.len(), "Session listener removed");
    }

    /// Deliver one notification to every listener, in registration order
    pub fn notify(&self, identity: Option<&Identity>) {
        // Snapshot so a listener dropping its own handle cannot deadlock
        let listeners: Vec<SessionListener> = self
            .registry()
            .listeners
            .iter()
            .map(|(_, l)| l.clone())
            .collect();

        for listener in listeners {
            listener(identity.cloned());
        }
    }

    pub fn len(&self) -> usize {
        self.registry().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet").field("len", &self.len()).finish()
    }
}
