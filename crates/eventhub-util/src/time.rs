//! Time utilities for EventHub
//!
//! Countdowns are computed against the wall clock, because event start times
//! are wall-clock instants.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `EVENTHUB_MOCK_TIME` environment variable can be set
//! to shift the clock used by `now()`. This makes it easy to look at
//! countdowns that are about to expire.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` (e.g., `2026-03-15 08:59:30`)
//!
//! Example:
//! ```bash
//! EVENTHUB_MOCK_TIME="2026-03-15 08:59:30" eventhub
//! ```

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::sync::OnceLock;

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "EVENTHUB_MOCK_TIME";

/// Format accepted by `EVENTHUB_MOCK_TIME`
pub const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used for event start timestamps in configuration
pub const EVENT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Offset between mock time and real time, computed once per process.
/// Mock time keeps advancing at the real rate.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // Wraps Local::now()
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                match parse_local(&mock_time_str, MOCK_TIME_FORMAT) {
                    Some(mock_dt) => {
                        let offset = mock_dt.signed_duration_since(chrono::Local::now());
                        tracing::info!(
                            mock_time = %mock_time_str,
                            offset_secs = offset.num_seconds(),
                            "Mock time enabled"
                        );
                        return Some(offset);
                    }
                    None => {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            expected_format = MOCK_TIME_FORMAT,
                            "Invalid mock time, using the real clock"
                        );
                    }
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current local time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)]
pub fn now() -> DateTime<Local> {
    let real_now = chrono::Local::now();

    if let Some(offset) = get_mock_time_offset() {
        real_now + offset
    } else {
        real_now
    }
}

fn parse_local(value: &str, format: &str) -> Option<DateTime<Local>> {
    let naive = NaiveDateTime::parse_from_str(value, format).ok()?;
    // Ambiguous local times (DST fall-back) resolve to the earlier instant
    Local.from_local_datetime(&naive).earliest()
}

/// Parse an event start timestamp (`YYYY-MM-DDTHH:MM:SS`, local time).
///
/// Returns `None` for malformed strings and for local times that do not
/// exist (skipped by a DST transition).
pub fn parse_event_timestamp(value: &str) -> Option<DateTime<Local>> {
    parse_local(value, EVENT_TIMESTAMP_FORMAT)
}

/// Signed milliseconds from `now` until `target`. Negative once `target` has passed.
pub fn millis_until(target: &DateTime<Local>, now: &DateTime<Local>) -> i64 {
    target.signed_duration_since(*now).num_milliseconds()
}

/// Zero-pad a countdown component to two digits.
pub fn pad2(value: u64) -> String {
    format!("{:02}", value)
}

/// Format an event start for listings, e.g. `Sunday, March 15, 2026, 09:00 AM`.
pub fn format_event_date(dt: &DateTime<Local>) -> String {
    dt.format("%A, %B %-d, %Y, %I:%M %p").to_string()
}

/// Format a DateTime with full date and time, for logs and summaries.
pub fn format_datetime_full(dt: &DateTime<Local>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use std::time::Duration;

    #[test]
    fn test_parse_event_timestamp() {
        let dt = parse_event_timestamp("2026-03-15T09:00:00").unwrap();
        assert_eq!(format_datetime_full(&dt), "2026-03-15 09:00:00");
    }

    #[test]
    fn test_parse_event_timestamp_rejects_other_formats() {
        let invalid = [
            "2026-03-15",
            "09:00:00",
            "2026-03-15 09:00:00",
            "2026/03/15T09:00:00",
            "",
            "soon",
        ];

        for value in &invalid {
            assert!(
                parse_event_timestamp(value).is_none(),
                "Expected '{}' to be rejected",
                value
            );
        }
    }

    #[test]
    fn test_millis_until() {
        let now = Local.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap();
        let later = now + chrono::Duration::milliseconds(90_061_000);
        let earlier = now - chrono::Duration::seconds(5);

        assert_eq!(millis_until(&later, &now), 90_061_000);
        assert_eq!(millis_until(&earlier, &now), -5_000);
        assert_eq!(millis_until(&now, &now), 0);
    }

    #[test]
    fn test_pad2() {
        assert_eq!(pad2(0), "00");
        assert_eq!(pad2(7), "07");
        assert_eq!(pad2(59), "59");
        assert_eq!(pad2(123), "123");
    }

    #[test]
    fn test_format_event_date() {
        let dt = Local.with_ymd_and_hms(2026, 3, 15, 9, 0, 0).unwrap();
        assert_eq!(format_event_date(&dt), "Sunday, March 15, 2026, 09:00 AM");

        let dt = Local.with_ymd_and_hms(2026, 2, 20, 14, 0, 0).unwrap();
        assert_eq!(format_event_date(&dt), "Friday, February 20, 2026, 02:00 PM");
    }

    #[test]
    fn test_now_advances() {
        let t1 = now();
        std::thread::sleep(Duration::from_millis(20));
        let t2 = now();

        assert!(t2 > t1, "Time should advance forward");
        assert!(t1.year() >= 2020);
    }

    #[test]
    fn test_mock_time_env_var_name() {
        assert_eq!(MOCK_TIME_ENV_VAR, "EVENTHUB_MOCK_TIME");
        assert!(NaiveDateTime::parse_from_str("2026-03-15 08:59:30", MOCK_TIME_FORMAT).is_ok());
    }
}
