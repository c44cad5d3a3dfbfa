//! Time source used for note timestamps.
//!
//! # Responsibility
//! - Provide the current time in epoch milliseconds to write paths.
//! - Allow tests to pin or advance time deterministically.

use crate::model::note::Timestamp;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" for creation and update timestamps.
pub trait Clock: Send + Sync {
    fn now_epoch_ms(&self) -> Timestamp;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Manually driven clock for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_epoch_ms: Timestamp) -> Self {
        Self {
            now: AtomicI64::new(start_epoch_ms),
        }
    }

    pub fn set(&self, epoch_ms: Timestamp) {
        self.now.store(epoch_ms, Ordering::SeqCst);
    }

    /// Moves time forward and returns the new value.
    pub fn advance(&self, delta_ms: i64) -> Timestamp {
        self.now.fetch_add(delta_ms, Ordering::SeqCst) + delta_ms
    }
}

impl Clock for ManualClock {
    fn now_epoch_ms(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_epoch_ms(&self) -> Timestamp {
        (**self).now_epoch_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock, SystemClock};
    use std::sync::Arc;

    #[test]
    fn manual_clock_set_and_advance() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_epoch_ms(), 1_000);
        assert_eq!(clock.advance(250), 1_250);
        clock.set(42);
        assert_eq!(clock.now_epoch_ms(), 42);
    }

    #[test]
    fn shared_clock_observes_updates() {
        let clock = Arc::new(ManualClock::new(10));
        let handle = Arc::clone(&clock);
        handle.advance(5);
        assert_eq!(clock.now_epoch_ms(), 15);
    }

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_epoch_ms() > 1_577_836_800_000);
    }
}
