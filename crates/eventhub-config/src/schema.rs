//! Raw configuration schema (as parsed from TOML)

use eventhub_api::GuardPolicy;
use serde::{Deserialize, Serialize};

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Application settings
    #[serde(default)]
    pub app: RawAppConfig,

    /// Local identity provider settings
    #[serde(default)]
    pub provider: RawProviderConfig,

    /// Static event list
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

/// Application-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawAppConfig {
    /// Countdown tick interval in milliseconds (default: 1000)
    pub tick_ms: Option<u64>,

    /// Route guard behaviour before the first session notification
    pub guard_policy: Option<GuardPolicy>,
}

/// Local identity provider settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawProviderConfig {
    /// Minimum password length for new accounts (default: 6)
    pub min_password_len: Option<usize>,

    /// Failed sign-ins before an email is locked (default: 5)
    pub max_failed_attempts: Option<u32>,

    /// Lockout length in seconds (default: 60)
    pub lockout_seconds: Option<u64>,

    /// Accounts that exist from startup
    #[serde(default)]
    pub accounts: Vec<RawAccount>,
}

/// Seeded account
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawAccount {
    pub email: String,
    pub password: String,
}

/// Raw event definition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawEvent {
    /// Unique stable ID, used in `/events/:id`
    pub id: String,

    pub title: String,

    /// Local start time, `YYYY-MM-DDTHH:MM:SS`
    pub start: String,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub description: String,

    pub address: Option<String>,
    pub details: Option<String>,
    pub organizer: Option<String>,
    pub capacity: Option<String>,
    pub category: Option<String>,
}
