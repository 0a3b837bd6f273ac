//! Validated settings structures

use crate::schema::{RawAccount, RawAppConfig, RawConfig, RawEvent, RawProviderConfig};
use crate::DEFAULT_MIN_PASSWORD_LEN;
use eventhub_api::{Event, GuardPolicy};
use eventhub_util::{parse_event_timestamp, EventId};
use std::time::Duration;
use tracing::warn;

/// Validated settings ready for use by the application
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Application configuration
    pub app: AppSettings,

    /// Local identity provider configuration
    pub provider: ProviderSettings,

    /// Validated events, in file order
    pub events: Vec<Event>,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        let events = raw.events.into_iter().filter_map(convert_event).collect();

        Self {
            app: AppSettings::from_raw(raw.app),
            provider: ProviderSettings::from_raw(raw.provider),
            events,
        }
    }

    /// Get event by ID
    pub fn get_event(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Countdown refresh period
    pub tick: Duration,
    pub guard_policy: GuardPolicy,
}

impl AppSettings {
    fn from_raw(raw: RawAppConfig) -> Self {
        Self {
            tick: raw
                .tick_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TICK),
            guard_policy: raw.guard_policy.unwrap_or_default(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            guard_policy: GuardPolicy::default(),
        }
    }
}

/// Local identity provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub min_password_len: usize,
    pub max_failed_attempts: u32,
    pub lockout: Duration,
    pub accounts: Vec<SeedAccount>,
}

impl ProviderSettings {
    fn from_raw(raw: RawProviderConfig) -> Self {
        Self {
            min_password_len: raw.min_password_len.unwrap_or(DEFAULT_MIN_PASSWORD_LEN),
            max_failed_attempts: raw
                .max_failed_attempts
                .unwrap_or(DEFAULT_MAX_FAILED_ATTEMPTS),
            lockout: raw
                .lockout_seconds
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_LOCKOUT),
            accounts: raw.accounts.into_iter().map(SeedAccount::from_raw).collect(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            min_password_len: DEFAULT_MIN_PASSWORD_LEN,
            max_failed_attempts: DEFAULT_MAX_FAILED_ATTEMPTS,
            lockout: DEFAULT_LOCKOUT,
            accounts: Vec::new(),
        }
    }
}

/// Account created at startup
#[derive(Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub email: String,
    pub password: String,
}

impl SeedAccount {
    fn from_raw(raw: RawAccount) -> Self {
        Self {
            email: raw.email.trim().to_string(),
            password: raw.password,
        }
    }
}

impl std::fmt::Debug for SeedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAccount")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn convert_event(raw: RawEvent) -> Option<Event> {
    let Some(start) = parse_event_timestamp(&raw.start) else {
        warn!(event_id = %raw.id, start = %raw.start, "Skipping event with unparseable start");
        return None;
    };

    Some(Event {
        id: EventId::new(raw.id),
        title: raw.title,
        start,
        location: raw.location,
        description: raw.description,
        address: raw.address,
        details: raw.details,
        organizer: raw.organizer,
        capacity: raw.capacity,
        category: raw.category,
    })
}

pub const DEFAULT_TICK: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 5;
pub const DEFAULT_LOCKOUT: Duration = Duration::from_secs(60);
