//! Event records

use chrono::{DateTime, Local};
use eventhub_util::EventId;
use serde::{Deserialize, Serialize};

/// An event as delivered by the event data source.
///
/// Only `id` and `start` matter to the core; the rest is display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub start: DateTime<Local>,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}
