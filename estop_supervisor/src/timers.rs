//! Saturating cycle timers.
//!
//! Every supervisor timer counts control cycles and holds at the configured
//! ceiling instead of wrapping. Restarts happen during the tick; all timers
//! advance together once the tick has been evaluated.

use serde::Serialize;

/// Cycle counter that saturates at a fixed ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTimer {
    elapsed: u32,
    ceiling: u32,
}

impl CycleTimer {
    /// Create a timer at zero.
    pub const fn new(ceiling: u32) -> Self {
        Self {
            elapsed: 0,
            ceiling,
        }
    }

    /// Cycles since the last restart, capped at the ceiling.
    #[inline]
    pub const fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Strictly more than `threshold` cycles have elapsed.
    #[inline]
    pub const fn exceeds(&self, threshold: u32) -> bool {
        self.elapsed > threshold
    }

    #[inline]
    pub fn restart(&mut self) {
        self.elapsed = 0;
    }

    /// Count one cycle unless already at the ceiling.
    #[inline]
    pub fn advance(&mut self) {
        if self.elapsed < self.ceiling {
            self.elapsed += 1;
        }
    }
}

/// The four supervisor timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSet {
    /// Since process start. Never restarted.
    pub since_startup: CycleTimer,
    /// Since the one-shot button release edge.
    pub since_button_release: CycleTimer,
    /// Since the last accepted recovery request.
    pub since_enable_request: CycleTimer,
    /// Since `stopped` last went true.
    pub since_stop_entry: CycleTimer,
}

impl TimerSet {
    /// All timers at zero, sharing one ceiling.
    pub const fn new(ceiling: u32) -> Self {
        Self {
            since_startup: CycleTimer::new(ceiling),
            since_button_release: CycleTimer::new(ceiling),
            since_enable_request: CycleTimer::new(ceiling),
            since_stop_entry: CycleTimer::new(ceiling),
        }
    }

    /// End-of-tick advance of every timer.
    pub fn advance_all(&mut self) {
        self.since_startup.advance();
        self.since_button_release.advance();
        self.since_enable_request.advance();
        self.since_stop_entry.advance();
    }

    pub const fn values(&self) -> TimerValues {
        TimerValues {
            since_startup: self.since_startup.elapsed(),
            since_button_release: self.since_button_release.elapsed(),
            since_enable_request: self.since_enable_request.elapsed(),
            since_stop_entry: self.since_stop_entry.elapsed(),
        }
    }
}

/// Plain copy of the timer values for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimerValues {
    pub since_startup: u32,
    pub since_button_release: u32,
    pub since_enable_request: u32,
    pub since_stop_entry: u32,
}

impl TimerValues {
    /// Largest of the four values.
    pub fn max(&self) -> u32 {
        self.since_startup
            .max(self.since_button_release)
            .max(self.since_enable_request)
            .max(self.since_stop_entry)
    }
}
