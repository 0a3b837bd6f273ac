//! Countdown value types

use chrono::{DateTime, Local};
use eventhub_util::pad2;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MILLIS_PER_SECOND: u64 = 1_000;
pub const MILLIS_PER_MINUTE: u64 = 60_000;
pub const MILLIS_PER_HOUR: u64 = 3_600_000;
pub const MILLIS_PER_DAY: u64 = 86_400_000;

/// Time left until a target, split into calendar-free units.
///
/// `hours < 24`, `minutes < 60`, `seconds < 60`. `days` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Breakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Breakdown {
    /// Milliseconds represented by this breakdown (sub-second part dropped)
    pub fn as_millis(&self) -> u64 {
        self.days * MILLIS_PER_DAY
            + self.hours * MILLIS_PER_HOUR
            + self.minutes * MILLIS_PER_MINUTE
            + self.seconds * MILLIS_PER_SECOND
    }
}

/// Renders as `D Days : HH Hours : MM Minutes : SS Seconds`
impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Days : {} Hours : {} Minutes : {} Seconds",
            self.days,
            pad2(self.hours),
            pad2(self.minutes),
            pad2(self.seconds)
        )
    }
}

/// Result of one countdown evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Remaining {
    Left(Breakdown),
    Expired,
}

impl Remaining {
    pub fn is_expired(&self) -> bool {
        matches!(self, Remaining::Expired)
    }

    pub fn breakdown(&self) -> Option<&Breakdown> {
        match self {
            Remaining::Left(b) => Some(b),
            Remaining::Expired => None,
        }
    }
}

/// Snapshot published by a countdown engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub target: DateTime<Local>,
    pub remaining: Remaining,
    /// The `now()` this snapshot was computed for
    pub evaluated_at: DateTime<Local>,
}
