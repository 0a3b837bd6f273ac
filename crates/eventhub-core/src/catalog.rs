//! Event data source

use async_trait::async_trait;
use eventhub_api::Event;
use eventhub_util::EventId;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Event Not Found")]
    NotFound(EventId),

    #[error("Event source unavailable: {0}")]
    Unavailable(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Replaceable fetch of the event list
#[async_trait]
pub trait EventSource: Send + Sync {
    /// All events, in display order
    async fn fetch_events(&self) -> CatalogResult<Vec<Event>>;

    /// One event by id
    async fn find(&self, id: &EventId) -> CatalogResult<Event> {
        self.fetch_events()
            .await?
            .into_iter()
            .find(|e| &e.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }
}

/// Serves a fixed list, typically the configured events
#[derive(Debug, Clone, Default)]
pub struct StaticEventSource {
    events: Vec<Event>,
}

impl StaticEventSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[async_trait]
impl EventSource for StaticEventSource {
    async fn fetch_events(&self) -> CatalogResult<Vec<Event>> {
        debug!(count = self.events.len(), "Serving static events");
        Ok(self.events.clone())
    }

    async fn find(&self, id: &EventId) -> CatalogResult<Event> {
        self.events
            .iter()
            .find(|e| &e.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }
}
