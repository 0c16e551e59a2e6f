//! Time sources for the scheduler.
//!
//! [`SystemClock`] reads the wall clock and the host's local calendar.
//! [`ManualClock`] only moves when told to and reads calendars in UTC, which
//! keeps tests independent of the machine they run on.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};

use crate::decompose::decompose_in;
use crate::units::UnitTuple;

/// Source of "now" for a countdown.
pub trait Clock {
    /// Current time in epoch milliseconds.
    fn now_ms(&self) -> i64;

    /// Breaks a duration into units using this clock's calendar.
    fn decompose(&self, duration_ms: i64, target_ms: i64, now_ms: i64) -> UnitTuple {
        decompose_in(&Local, duration_ms, target_ms, now_ms)
    }
}

/// Wall clock with the host's local calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only advances when told to.
///
/// Clones share the same reading, so a test can keep one handle while the
/// widget owns another.
///
/// ```rust
/// use bubbletea_countdown::clock::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new(1_000);
/// let widget_clock = clock.clone();
/// clock.advance(Duration::from_secs(2));
/// assert_eq!(widget_clock.now_ms(), 3_000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Arc<AtomicI64>,
}

impl ManualClock {
    /// A clock reading `now_ms`.
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms: Arc::new(AtomicI64::new(now_ms)),
        }
    }

    /// Jumps to `now_ms`.
    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    /// Moves forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let delta = i64::try_from(delta.as_millis()).unwrap_or(i64::MAX);
        self.now_ms.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    fn decompose(&self, duration_ms: i64, target_ms: i64, now_ms: i64) -> UnitTuple {
        decompose_in(&Utc, duration_ms, target_ms, now_ms)
    }
}
