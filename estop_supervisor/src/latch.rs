//! Sticky per-source fault latches.
//!
//! Drives and the spindle VFD report faults whenever they are unpowered: at
//! startup, while the physical button is held, and just after a recovery
//! power cycle. Those sources only latch once every grace window has passed.
//! Following errors and the button itself always latch immediately.
//!
//! Latches only ever go false→true here. The bulk clear belongs to the
//! completing recovery sequence.

use estop_common::supervisor::config::TimingConfig;
use estop_common::supervisor::fault::FaultSource;

use crate::aggregator::InstantFaults;
use crate::timers::TimerSet;

/// Result of one latch update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatchUpdate {
    /// Sources that went from not-latched to latched this tick.
    pub newly_latched: FaultSource,
    /// First tick the button was seen released after being latched pushed.
    pub release_edge: bool,
}

/// Latched fault memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatchBank {
    latched: FaultSource,
    spindle_error_code: i32,
    button_released: bool,
}

impl LatchBank {
    pub const fn new() -> Self {
        Self {
            latched: FaultSource::empty(),
            spindle_error_code: 0,
            button_released: false,
        }
    }

    /// Latched sources. `STOP_BUTTON` here means the button was pushed.
    #[inline]
    pub const fn latched(&self) -> FaultSource {
        self.latched
    }

    /// Last latched spindle error code (0 = none).
    #[inline]
    pub const fn spindle_error_code(&self) -> i32 {
        self.spindle_error_code
    }

    #[inline]
    pub const fn button_pushed(&self) -> bool {
        self.latched.contains(FaultSource::STOP_BUTTON)
    }

    #[inline]
    pub const fn button_released(&self) -> bool {
        self.button_released
    }

    #[inline]
    pub const fn any_latched(&self) -> bool {
        !self.latched.is_empty()
    }

    /// Whether guarded sources may latch this tick.
    ///
    /// Evaluated on the timers as they stand at the start of the tick.
    pub fn latching_allowed(
        &self,
        button_pressed: bool,
        timers: &TimerSet,
        timing: &TimingConfig,
    ) -> bool {
        !button_pressed
            && !self.button_pushed()
            && timers.since_startup.exceeds(timing.startup_grace)
            && timers.since_enable_request.exceeds(timing.reset_duration)
            && timers.since_button_release.exceeds(timing.startup_grace)
    }

    /// Fold this tick's instantaneous faults into the latches.
    pub fn update(&mut self, instant: &InstantFaults, allow_guarded: bool) -> LatchUpdate {
        let before = self.latched;

        let mut latch = instant.sources & !FaultSource::GUARDED_MASK;
        if allow_guarded {
            latch |= instant.sources & FaultSource::GUARDED_MASK;
            if instant.sources.contains(FaultSource::SPINDLE_ERROR) {
                self.spindle_error_code = instant.spindle_error_code;
            }
        }
        self.latched |= latch;

        let mut release_edge = false;
        if self.button_pushed() && !instant.button_pressed() {
            release_edge = !self.button_released;
            self.button_released = true;
        }

        LatchUpdate {
            newly_latched: self.latched.difference(before),
            release_edge,
        }
    }

    /// Drop every latch at once.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
