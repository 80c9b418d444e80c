use std::cell::Cell;
use std::time::Instant;

use crate::foundation::core::{DurationMs, TimestampMs};

/// Time source for the engine.
///
/// The engine never reads the wall clock directly; every operation that
/// depends on time takes a [`TimestampMs`] produced by one of these. This
/// keeps evaluation deterministic for a given input sequence.
pub trait Clock {
    fn now(&self) -> TimestampMs;

    /// Block until roughly `d` has elapsed. Only the snapshot warm-up pass
    /// uses this, to pace its decode polling.
    fn sleep(&self, d: DurationMs);
}

/// Monotonic wall-clock time, origin at construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> TimestampMs {
        TimestampMs(self.origin.elapsed().as_millis() as u64)
    }

    fn sleep(&self, d: DurationMs) {
        std::thread::sleep(std::time::Duration::from_millis(d.0));
    }
}

/// Manually advanced clock for tests and fixed-step drivers.
///
/// `sleep` advances the clock instead of blocking, so code that waits with
/// a deadline terminates immediately under test.
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start: TimestampMs) -> Self {
        Self {
            now: Cell::new(start.0),
        }
    }

    pub fn advance(&self, d: DurationMs) {
        self.now.set(self.now.get().saturating_add(d.0));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimestampMs {
        TimestampMs(self.now.get())
    }

    fn sleep(&self, d: DurationMs) {
        self.advance(d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_on_sleep() {
        let clock = ManualClock::new(TimestampMs(0));
        clock.sleep(DurationMs(25));
        clock.advance(DurationMs(5));
        assert_eq!(clock.now(), TimestampMs(30));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
