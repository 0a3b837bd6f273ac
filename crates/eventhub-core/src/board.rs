//! Countdowns owned by one view

use chrono::{DateTime, Local};
use eventhub_api::CountdownState;
use eventhub_util::EventId;
use std::collections::HashMap;
use tokio::sync::watch;
use tracing::debug;

use crate::{CountdownEngine, CountdownHandle};

/// One countdown per displayed event.
///
/// Every handle the board starts is stopped by `unmount`, `clear`, a remount
/// with a different target, or dropping the board.
pub struct CountdownBoard {
    engine: CountdownEngine,
    handles: HashMap<EventId, CountdownHandle>,
}

impl CountdownBoard {
    pub fn new(engine: CountdownEngine) -> Self {
        Self {
            engine,
            handles: HashMap::new(),
        }
    }

    /// Show a countdown for `event_id`.
    ///
    /// Mounting an event that is already shown with the same target keeps the
    /// running countdown. A different target replaces it.
    pub fn mount(
        &mut self,
        event_id: EventId,
        target: DateTime<Local>,
    ) -> watch::Receiver<CountdownState> {
        if let Some(existing) = self.handles.get(&event_id) {
            if existing.current().target == target {
                return existing.subscribe();
            }
            debug!(event_id = %event_id, "Countdown target changed, restarting");
        }

        let handle = self.engine.start(target);
        let receiver = handle.subscribe();
        // Replacing the entry drops, and so stops, the previous handle
        self.handles.insert(event_id, handle);
        receiver
    }

    /// Stop and forget the countdown for `event_id`. Returns whether one existed.
    pub fn unmount(&mut self, event_id: &EventId) -> bool {
        match self.handles.remove(event_id) {
            Some(mut handle) => {
                handle.stop();
                true
            }
            None => false,
        }
    }

    /// Stop every countdown
    pub fn clear(&mut self) {
        if !self.handles.is_empty() {
            debug!(count = self.handles.len(), "Clearing countdown board");
        }
        for (_, mut handle) in self.handles.drain() {
            handle.stop();
        }
    }

    pub fn state(&self, event_id: &EventId) -> Option<CountdownState> {
        self.handles.get(event_id).map(CountdownHandle::current)
    }

    pub fn handle(&self, event_id: &EventId) -> Option<&CountdownHandle> {
        self.handles.get(event_id)
    }

    /// Events that currently have a countdown
    pub fn ids(&self) -> impl Iterator<Item = &EventId> {
        self.handles.keys()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Number of countdowns still ticking
    pub fn active_count(&self) -> usize {
        self.handles.values().filter(|h| h.is_active()).count()
    }
}

impl Drop for CountdownBoard {
    fn drop(&mut self) {
        self.clear();
    }
}
