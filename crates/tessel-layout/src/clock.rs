//! Time sources for `updated_at` / `created_at` stamps.
//!
//! The reducer never reads the wall clock itself; it asks the [`Clock`] it
//! was built with, so tests and replays can pin time.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use web_time::{SystemTime, UNIX_EPOCH};

use crate::widget::Timestamp;

/// Source of the current time in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> Timestamp;
}

/// Wall-clock time. Reports 0 if the system clock is before the epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// Manually driven clock for tests and deterministic replay.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    #[must_use]
    pub const fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::Relaxed);
    }

    pub fn advance(&self, delta_ms: u64) {
        let _ = self.now.fetch_add(delta_ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Timestamp {
        self.now.load(Ordering::Relaxed)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Timestamp {
        (**self).now_ms()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> Timestamp {
        (**self).now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_set_and_advance() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_ms(), 100);
        clock.advance(25);
        assert_eq!(clock.now_ms(), 125);
        clock.set(7);
        assert_eq!(clock.now_ms(), 7);
    }

    #[test]
    fn borrowed_and_shared_clocks_delegate() {
        let clock = Arc::new(ManualClock::new(42));
        let by_ref: &ManualClock = &clock;
        assert_eq!(by_ref.now_ms(), 42);
        assert_eq!(clock.now_ms(), 42);
    }

    #[test]
    fn system_clock_is_past_2020() {
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }
}
