//! Clock adapters.

use std::sync::{Mutex, PoisonError};

use chrono::DateTime;

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<Timestamp>,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Starts at an RFC 3339 instant. Falls back to the Unix epoch when
    /// the text does not parse.
    pub fn at_rfc3339(rfc3339: &str) -> Self {
        let now = DateTime::parse_from_rfc3339(rfc3339)
            .map(|dt| Timestamp::from_datetime(dt.into()))
            .ok()
            .or_else(|| Timestamp::from_unix_secs(0))
            .unwrap_or_default();
        Self::new(now)
    }

    pub fn set(&self, now: Timestamp) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance_secs(&self, secs: i64) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = now.plus_secs(secs);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances_on_request() {
        let clock = FixedClock::at_rfc3339("2024-01-15T00:00:00Z");
        let start = clock.now();

        clock.advance_secs(61);

        assert_eq!(clock.now().duration_since(&start).num_seconds(), 61);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
