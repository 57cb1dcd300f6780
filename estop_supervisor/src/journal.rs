//! Fixed-capacity journal of latch transitions.
//!
//! Filled from the RT tick without allocating; drained by a non-RT consumer
//! (diagnostics, UI). When full, the oldest entry is dropped and counted.

use estop_common::consts::JOURNAL_CAPACITY;
use estop_common::supervisor::fault::FaultSource;
use estop_common::supervisor::signals::Axis;

/// One source going from not-latched to latched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatchEvent {
    /// Tick on which the latch was set.
    pub tick: u64,
    /// Single source bit.
    pub source: FaultSource,
    /// Captured code for `SPINDLE_ERROR`, else 0.
    pub spindle_error_code: i32,
}

impl LatchEvent {
    #[inline]
    pub fn axis(&self) -> Option<Axis> {
        self.source.axis()
    }
}

impl std::fmt::Display for LatchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.source == FaultSource::SPINDLE_ERROR {
            write!(
                f,
                "[{}] E-Stop: {}: code {}",
                self.tick,
                self.source.describe(),
                self.spindle_error_code
            )
        } else {
            write!(f, "[{}] E-Stop: {}", self.tick, self.source.describe())
        }
    }
}

/// Bounded ring of recent latch events.
#[derive(Debug, Clone)]
pub struct FaultJournal {
    events: heapless::Deque<LatchEvent, JOURNAL_CAPACITY>,
    dropped: u64,
}

impl Default for FaultJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl FaultJournal {
    pub const fn new() -> Self {
        Self {
            events: heapless::Deque::new(),
            dropped: 0,
        }
    }

    /// Append an event, evicting the oldest when full.
    pub fn record(&mut self, event: LatchEvent) {
        if self.events.is_full() && self.events.pop_front().is_some() {
            self.dropped += 1;
        }
        if self.events.push_back(event).is_err() {
            self.dropped += 1;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events evicted because the journal was full.
    #[inline]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Oldest to newest, without removing.
    pub fn iter(&self) -> impl Iterator<Item = &LatchEvent> {
        self.events.iter()
    }

    /// Remove and yield events oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = LatchEvent> + '_ {
        std::iter::from_fn(move || self.events.pop_front())
    }
}
