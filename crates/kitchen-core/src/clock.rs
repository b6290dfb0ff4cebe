//! Time sources for the stage.
//!
//! Timers are measured against timestamps rather than tick counts, so the
//! length of a cut does not depend on how often the stage is ticked. The
//! stage reads a [`Clock`] once per entry point and passes the resulting
//! [`Millis`] down; nothing below the stage reads a clock directly.

use crate::id::Millis;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic millisecond source.
pub trait Clock: std::fmt::Debug {
    /// Milliseconds since an arbitrary, fixed origin.
    fn now_ms(&self) -> Millis;
}

// ---------------------------------------------------------------------------
// System clock
// ---------------------------------------------------------------------------

/// Wall-clock time, measured from the moment the clock was created.
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
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

// ---------------------------------------------------------------------------
// Manual clock
// ---------------------------------------------------------------------------

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give
/// another to the stage.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Millis>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: Millis) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    pub fn advance_ms(&self, ms: Millis) {
        self.now.set(self.now.get() + ms);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance_ms(secs * 1000);
    }

    pub fn set(&self, ms: Millis) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}
