use std::time::{Duration, Instant};

use dashmap::DashMap;

const WINDOW: Duration = Duration::from_secs(15 * 60);
const MAX_FAILURES: u32 = 5;

#[derive(Debug, Clone, Copy)]
struct FailureWindow {
    failures: u32,
    opened: Instant,
}

impl FailureWindow {
    fn expired(&self, now: Instant, window: Duration) -> bool {
        now.duration_since(self.opened) > window
    }
}

/// Failed password attempts per email, keyed case-insensitively.
pub struct LoginRateLimiter {
    max_failures: u32,
    window: Duration,
    entries: DashMap<String, FailureWindow>,
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginRateLimiter {
    /// Five failures per fifteen minutes.
    pub fn new() -> Self {
        Self::with_limits(MAX_FAILURES, WINDOW)
    }

    pub fn with_limits(max_failures: u32, window: Duration) -> Self {
        Self {
            max_failures,
            window,
            entries: DashMap::new(),
        }
    }

    /// `Err` carries the time left until the window closes.
    /// Checking never counts as an attempt.
    pub fn check(&self, email: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let Some(entry) = self.entries.get(&email.to_lowercase()) else {
            return Ok(());
        };

        if entry.expired(now, self.window) || entry.failures < self.max_failures {
            return Ok(());
        }

        Err(self.window.saturating_sub(now.duration_since(entry.opened)))
    }

    pub fn record_failure(&self, email: &str) {
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(email.to_lowercase())
            .or_insert(FailureWindow {
                failures: 0,
                opened: now,
            });

        if entry.expired(now, self.window) {
            *entry = FailureWindow {
                failures: 1,
                opened: now,
            };
        } else {
            entry.failures += 1;
        }
    }

    pub fn reset(&self, email: &str) {
        self.entries.remove(&email.to_lowercase());
    }
}
