//! Controllable clocks.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Instant used as "now" by fixtures: 2026-03-02 09:30:00 UTC.
#[must_use]
pub fn fixture_now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).single() {
        Some(now) => now,
        None => panic!("fixture timestamp is unambiguous"),
    }
}

/// Clock whose time only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Start the clock at [`fixture_now`].
    #[must_use]
    pub fn at_fixture_time() -> Self {
        Self::new(fixture_now())
    }

    /// Move the clock forward.
    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}
