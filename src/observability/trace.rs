//! Per-operation diagnostic tracing
//!
//! Each traced line carries a wall-clock timestamp, the milliseconds
//! elapsed since the tracer was created, the operation name, and a detail
//! string with the call's parameters and outcome:
//!
//! ```text
//! [07/08/26 14:02:11] [001204] OPEN name=/db.dat flags=0x0006 rc=OK
//! ```
//!
//! The enable state lives on the tracer itself and may be flipped at any
//! time; a disabled tracer costs one atomic load per call.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::{TimeZone, Utc};

use crate::clock::Clock;

/// Runtime-toggleable operation tracer.
pub struct Trace {
    enabled: AtomicBool,
    started: Instant,
}

impl Trace {
    /// Create a tracer in the given initial state.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            started: Instant::now(),
        }
    }

    /// Turn tracing on.
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    /// Turn tracing off.
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Trace one operation with its parameters and outcome.
    pub fn op(&self, clock: &dyn Clock, name: &str, detail: fmt::Arguments<'_>) {
        if !self.is_enabled() {
            return;
        }
        let mut err = io::stderr().lock();
        let _ = self.write_line(&mut err, clock, name, detail);
    }

    fn write_line<W: Write>(
        &self,
        writer: &mut W,
        clock: &dyn Clock,
        name: &str,
        detail: fmt::Arguments<'_>,
    ) -> io::Result<()> {
        let stamp = Utc
            .timestamp_opt(clock.now_unix(), 0)
            .single()
            .map(|t| t.format("%d/%m/%y %H:%M:%S").to_string())
            .unwrap_or_else(|| "--/--/-- --:--:--".to_string());
        let elapsed = self.started.elapsed().as_millis();
        writeln!(writer, "[{}] [{:06}] {} {}", stamp, elapsed, name, detail)
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::new(false)
    }
}
