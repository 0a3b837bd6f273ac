//! Configuration validation

use crate::schema::{RawConfig, RawEvent};
use crate::DEFAULT_MIN_PASSWORD_LEN;
use eventhub_util::{is_valid_email, parse_event_timestamp};
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Event '{event_id}': {message}")]
    EventError { event_id: String, message: String },

    #[error("Duplicate event ID: {0}")]
    DuplicateEventId(String),

    #[error("Event '{event_id}': invalid start '{value}', expected YYYY-MM-DDTHH:MM:SS")]
    InvalidTimestamp { event_id: String, value: String },

    #[error("Account '{email}': {message}")]
    AccountError { email: String, message: String },

    #[error("Duplicate account: {0}")]
    DuplicateAccount(String),

    #[error("Global config error: {0}")]
    GlobalError(String),
}

/// Validate a raw configuration, collecting every problem
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.app.tick_ms == Some(0) {
        errors.push(ValidationError::GlobalError(
            "app.tick_ms must be greater than zero".into(),
        ));
    }

    if config.provider.min_password_len == Some(0) {
        errors.push(ValidationError::GlobalError(
            "provider.min_password_len must be greater than zero".into(),
        ));
    }

    if config.provider.max_failed_attempts == Some(0) {
        errors.push(ValidationError::GlobalError(
            "provider.max_failed_attempts must be greater than zero".into(),
        ));
    }

    let mut seen_ids = HashSet::new();
    for event in &config.events {
        if !seen_ids.insert(event.id.as_str()) {
            errors.push(ValidationError::DuplicateEventId(event.id.clone()));
        }
        errors.extend(validate_event(event));
    }

    errors.extend(validate_accounts(config));

    errors
}

fn validate_event(event: &RawEvent) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if event.id.trim().is_empty() {
        errors.push(ValidationError::EventError {
            event_id: event.id.clone(),
            message: "id cannot be empty".into(),
        });
    } else if event.id.contains('/') || event.id.chars().any(char::is_whitespace) {
        errors.push(ValidationError::EventError {
            event_id: event.id.clone(),
            message: "id cannot contain '/' or whitespace".into(),
        });
    }

    if event.title.trim().is_empty() {
        errors.push(ValidationError::EventError {
            event_id: event.id.clone(),
            message: "title cannot be empty".into(),
        });
    }

    if parse_event_timestamp(&event.start).is_none() {
        errors.push(ValidationError::InvalidTimestamp {
            event_id: event.id.clone(),
            value: event.start.clone(),
        });
    }

    errors
}

fn validate_accounts(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let min_len = config
        .provider
        .min_password_len
        .unwrap_or(DEFAULT_MIN_PASSWORD_LEN);

    let mut seen = HashSet::new();
    for account in &config.provider.accounts {
        let email = account.email.trim().to_lowercase();

        if !is_valid_email(&email) {
            errors.push(ValidationError::AccountError {
                email: account.email.clone(),
                message: "expected name@domain.tld".into(),
            });
        }

        if account.password.chars().count() < min_len {
            errors.push(ValidationError::AccountError {
                email: account.email.clone(),
                message: format!("password must be at least {} characters", min_len),
            });
        }

        if !seen.insert(email) {
            errors.push(ValidationError::DuplicateAccount(account.email.clone()));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RawAccount, RawAppConfig, RawProviderConfig};

    fn event(id: &str, start: &str) -> RawEvent {
        RawEvent {
            id: id.into(),
            title: format!("Event {}", id),
            start: start.into(),
            location: String::new(),
            description: String::new(),
            address: None,
            details: None,
            organizer: None,
            capacity: None,
            category: None,
        }
    }

    fn config(events: Vec<RawEvent>) -> RawConfig {
        RawConfig {
            config_version: 1,
            app: RawAppConfig::default(),
            provider: RawProviderConfig::default(),
            events,
        }
    }

    #[test]
    fn test_valid_config_has_no_errors() {
        let config = config(vec![
            event("1", "2026-03-15T09:00:00"),
            event("2", "2026-02-20T14:00:00"),
        ]);
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn test_duplicate_id_detection() {
        let config = config(vec![
            event("1", "2026-03-15T09:00:00"),
            event("1", "2026-02-20T14:00:00"),
        ]);

        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateEventId(_))));
    }

    #[test]
    fn test_invalid_timestamp() {
        let config = config(vec![event("1", "March 15th")]);

        let errors = validate_config(&config);
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::InvalidTimestamp { event_id, .. }] if event_id == "1"
        ));
    }

    #[test]
    fn test_bad_ids_and_titles() {
        let mut untitled = event("a/b", "2026-03-15T09:00:00");
        untitled.title = "  ".into();
        let config = config(vec![untitled, event("", "2026-03-15T09:00:00")]);

        let errors = validate_config(&config);
        assert_eq!(
            errors
                .iter()
                .filter(|e| matches!(e, ValidationError::EventError { .. }))
                .count(),
            3
        );
    }

    #[test]
    fn test_zero_tick_rejected() {
        let mut config = config(vec![]);
        config.app.tick_ms = Some(0);

        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::GlobalError(_))));
    }

    #[test]
    fn test_account_validation() {
        let mut config = config(vec![]);
        config.provider.accounts = vec![
            RawAccount {
                email: "demo@eventhub.dev".into(),
                password: "demo-pass".into(),
            },
            RawAccount {
                email: "DEMO@eventhub.dev".into(),
                password: "demo-pass".into(),
            },
            RawAccount {
                email: "nobody".into(),
                password: "short".into(),
            },
        ];

        let errors = validate_config(&config);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateAccount(_))));
        assert_eq!(
            errors
                .iter()
                .filter(|e| matches!(e, ValidationError::AccountError { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_account_email_with_extra_at_or_space() {
        let mut config = config(vec![]);
        config.provider.accounts = ["a@b@c.com", "a b@c.com"]
            .into_iter()
            .map(|email| RawAccount {
                email: email.into(),
                password: "secret1".into(),
            })
            .collect();

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, ValidationError::AccountError { .. })));
    }
}
