//! Failed-attempt throttling

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Per-key failure counter with a fixed lockout window.
///
/// After `max_failures` consecutive failures a key is locked for `lockout`.
/// A success resets the key.
#[derive(Debug)]
pub struct AttemptLimiter {
    max_failures: u32,
    lockout: Duration,
    keys: HashMap<String, KeyState>,
}

#[derive(Debug)]
struct KeyState {
    failures: u32,
    locked_until: Option<Instant>,
}

impl AttemptLimiter {
    /// Create a new limiter
    ///
    /// # Arguments
    /// * `max_failures` - Consecutive failures allowed before locking
    /// * `lockout` - How long a locked key stays locked
    pub fn new(max_failures: u32, lockout: Duration) -> Self {
        Self {
            max_failures: max_failures.max(1),
            lockout,
            keys: HashMap::new(),
        }
    }

    /// Returns `true` if the key is currently locked out
    pub fn is_locked(&mut self, key: &str, now: Instant) -> bool {
        let Some(state) = self.keys.get_mut(key) else {
            return false;
        };

        match state.locked_until {
            Some(until) if now < until => true,
            Some(_) => {
                // Lockout elapsed, start counting again
                state.locked_until = None;
                state.failures = 0;
                false
            }
            None => false,
        }
    }

    /// Record a failed attempt. Returns `true` if this failure locked the key.
    pub fn record_failure(&mut self, key: &str, now: Instant) -> bool {
        let state = self.keys.entry(key.to_string()).or_insert(KeyState {
            failures: 0,
            locked_until: None,
        });

        state.failures += 1;
        if state.failures >= self.max_failures {
            state.locked_until = Some(now + self.lockout);
            true
        } else {
            false
        }
    }

    /// Forget a key after a successful attempt
    pub fn reset(&mut self, key: &str) {
        self.keys.remove(key);
    }
}
