//! Time and delay sources consumed by the adapter
//!
//! The deployed target reads a battery-backed RTC and blocks on a tick
//! timer; hosted builds substitute the system clock and a thread sleep.
//! Both are seconds-resolution at the boundary - sub-second precision is
//! the adapter's own concern.

use std::thread;
use std::time::Duration;

use chrono::Utc;

/// A seconds-resolution real-time clock.
pub trait Clock {
    /// Current time as seconds since the Unix epoch, UTC.
    fn now_unix(&self) -> i64;
}

/// A blocking millisecond delay primitive.
pub trait DelaySource {
    /// Block the calling task for `ms` milliseconds.
    fn delay_ms(&self, ms: u64);
}

/// Clock backed by the host system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Delay backed by a host thread sleep.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostDelay;

impl DelaySource for HostDelay {
    fn delay_ms(&self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}

/// Clock pinned to one instant, for tests and simulation.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix(&self) -> i64 {
        self.0
    }
}
