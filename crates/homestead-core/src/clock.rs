//! Time source for the simulation.
//!
//! Growth readiness is derived from epoch-millisecond timestamps, so the
//! clock must be safe across process restarts: a crop planted before a
//! shutdown is compared against the same time base after the next launch.
//! [`SystemClock`] reads UTC wall-clock time; [`ManualClock`] is a settable
//! clock for tests and replays.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Number of milliseconds in one second.
pub const MS_PER_SECOND: i64 = 1_000;

/// A source of the current time in epoch milliseconds.
pub trait Clock {
    /// Current time, in milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

/// Wall-clock UTC time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
///
/// Interior mutability lets a test hold one handle (usually through an
/// [`Arc`]) while the processor owns another.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `start_ms`.
    pub const fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    /// Move forward (or backward, for negative values) by `delta_ms`,
    /// saturating at the `i64` bounds. Returns the new time.
    pub fn advance_ms(&self, delta_ms: i64) -> i64 {
        let next = self.now_ms().saturating_add(delta_ms);
        self.set(next);
        next
    }

    /// Move forward by whole seconds. Returns the new time.
    pub fn advance_secs(&self, secs: u64) -> i64 {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        self.advance_ms(secs.saturating_mul(MS_PER_SECOND))
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> i64 {
        (**self).now_ms()
    }
}
