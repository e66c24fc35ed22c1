//! Time sources for tick-driven scheduling

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Source of "now" for the animation scheduler
pub trait Clock {
    /// Current instant
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually stepped clock, for tests and deterministic replays
#[derive(Debug, Clone)]
pub struct ManualClock {
    start: Instant,
    current: Cell<Instant>,
}

impl ManualClock {
    /// Create a clock frozen at the current wall time
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            current: Cell::new(now),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, delta: Duration) {
        self.current.set(self.current.get() + delta);
    }

    /// Time elapsed since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.current.get() - self.start
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.current.get()
    }
}
