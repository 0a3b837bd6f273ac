//! Configuration parsing and validation for EventHub
//!
//! Supports TOML configuration with:
//! - Versioned schema
//! - Countdown tick and route guard settings
//! - Local identity provider settings and seeded accounts
//! - The static event catalog
//! - Validation with clear error messages

mod schema;
mod settings;
mod validation;

pub use schema::*;
pub use settings::*;
pub use validation::*;

use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<ValidationError> },

    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Load and validate configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Settings> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading configuration");
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from a TOML string
pub fn parse_config(content: &str) -> ConfigResult<Settings> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.config_version != CURRENT_CONFIG_VERSION {
        return Err(ConfigError::UnsupportedVersion(raw.config_version));
    }

    let errors = validate_config(&raw);
    if !errors.is_empty() {
        return Err(ConfigError::ValidationFailed { errors });
    }

    Ok(Settings::from_raw(raw))
}

/// Current supported config version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Minimum password length when the config does not set one
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 6;

#[cfg(test)]
mod tests {
    use super::*;
    use eventhub_api::GuardPolicy;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn parse_minimal_config() {
        let config = r#"
            config_version = 1

            [[events]]
            id = "1"
            title = "Tech Conference 2026"
            start = "2026-03-15T09:00:00"
            location = "San Francisco, CA"
            description = "Join us for the biggest tech event of the year."
        "#;

        let settings = parse_config(config).unwrap();
        assert_eq!(settings.events.len(), 1);
        assert_eq!(settings.events[0].id.as_str(), "1");
        assert_eq!(settings.events[0].title, "Tech Conference 2026");
        assert!(settings.events[0].organizer.is_none());
    }

    #[test]
    fn parse_full_config() {
        let config = r#"
            config_version = 1

            [app]
            tick_ms = 250
            guard_policy = "defer_while_loading"

            [provider]
            min_password_len = 8
            max_failed_attempts = 3
            lockout_seconds = 30

            [[provider.accounts]]
            email = "demo@eventhub.dev"
            password = "demo-password"

            [[events]]
            id = "music-fest"
            title = "Music Festival"
            start = "2026-06-20T16:00:00"
            location = "Austin, TX"
            description = "Three days of live music."
            organizer = "Live Nation"
            capacity = "20000 attendees"
            category = "Music"
        "#;

        let settings = parse_config(config).unwrap();
        assert_eq!(settings.app.tick, Duration::from_millis(250));
        assert_eq!(settings.app.guard_policy, GuardPolicy::DeferWhileLoading);
        assert_eq!(settings.provider.min_password_len, 8);
        assert_eq!(settings.provider.max_failed_attempts, 3);
        assert_eq!(settings.provider.lockout, Duration::from_secs(30));
        assert_eq!(settings.provider.accounts.len(), 1);
        assert_eq!(settings.provider.accounts[0].email, "demo@eventhub.dev");

        let event = settings.get_event(&"music-fest".into()).unwrap();
        assert_eq!(event.category.as_deref(), Some("Music"));
    }

    #[test]
    fn demo_config_is_valid() {
        let settings = parse_config(include_str!("../../../demos/eventhub.toml")).unwrap();
        assert_eq!(settings.events.len(), 6);
        assert_eq!(settings.provider.accounts.len(), 1);
        assert_eq!(settings.app.guard_policy, GuardPolicy::FailClosed);
    }

    #[test]
    fn reject_wrong_version() {
        let config = r#"
            config_version = 99
        "#;

        let result = parse_config(config);
        assert!(matches!(result, Err(ConfigError::UnsupportedVersion(99))));
    }

    #[test]
    fn reject_invalid_config() {
        let config = r#"
            config_version = 1

            [app]
            tick_ms = 0

            [[events]]
            id = "1"
            title = "Broken"
            start = "tomorrow"
        "#;

        match parse_config(config) {
            Err(ConfigError::ValidationFailed { errors }) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn reject_malformed_toml() {
        let result = parse_config("config_version = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            config_version = 1

            [[events]]
            id = "7"
            title = "Food Festival"
            start = "2026-07-04T11:00:00"
            "#
        )
        .unwrap();

        let settings = load_config(file.path()).unwrap();
        assert_eq!(settings.events.len(), 1);
        assert_eq!(settings.events[0].location, "");
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }
}
