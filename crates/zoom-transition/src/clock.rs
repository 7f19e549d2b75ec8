//! Time sources for completion timers.
//!
//! The controller never sleeps or spawns timers. It records deadlines against
//! a [`Clock`] and checks them when the host calls `poll`. Hosts pass a
//! [`SystemClock`]; tests and deterministic drivers pass a [`ManualClock`] and
//! advance it by hand.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Monotonic millisecond clock.
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
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
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Virtual clock that only moves when told to.
///
/// Clones share the same time, so a test can hand one clone to a controller
/// and keep another to drive it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward. Negative or non-finite deltas are ignored.
    pub fn advance(&self, delta_ms: f64) {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.now.set(self.now.get() + delta_ms);
        }
    }

    /// Jump to an absolute time, never backwards.
    pub fn set(&self, now_ms: f64) {
        if now_ms.is_finite() && now_ms > self.now.get() {
            self.now.set(now_ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_shared() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance(100.0);
        assert_eq!(clock.now_ms(), 100.0);

        clock.advance(-50.0);
        clock.set(20.0);
        assert_eq!(handle.now_ms(), 100.0);

        clock.set(250.0);
        assert_eq!(handle.now_ms(), 250.0);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
