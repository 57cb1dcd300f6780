//! Timed recovery sequence.
//!
//! Once a recovery request is accepted the drives are power-cycled to clear
//! their internal fault latches, then the supervisor latches are cleared:
//!
//! 1. `Disabling`, `[0, disable_duration)`: all motor enables false.
//! 2. `Waiting`, `[disable_duration, reset_duration]`: motor enables true.
//! 3. `Completing`, `> reset_duration`, one tick: clear latches, end request.
//!
//! The phase is derived from `since_enable_request` every tick. A new raw
//! fault during the sequence is not special-cased; it reasserts the stop
//! through the output deriver and the operator has to request again.

use estop_common::supervisor::config::TimingConfig;
use tracing::info;

use crate::latch::LatchBank;
use crate::timers::TimerSet;

/// Current phase of the recovery sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryPhase {
    /// No recovery in progress.
    Idle,
    /// Motors forced off.
    Disabling,
    /// Motors re-enabled, waiting for drives to settle.
    Waiting,
    /// Latches cleared this tick.
    Completing,
}

impl RecoveryPhase {
    /// Phase for a request that has been running for `elapsed` cycles.
    pub const fn at(elapsed: u32, timing: &TimingConfig) -> Self {
        if elapsed < timing.disable_duration {
            Self::Disabling
        } else if elapsed <= timing.reset_duration {
            Self::Waiting
        } else {
            Self::Completing
        }
    }

    /// Motor enable level driven by this phase; `None` holds the last level.
    #[inline]
    pub const fn motor_enable(self) -> Option<bool> {
        match self {
            Self::Idle => None,
            Self::Disabling => Some(false),
            Self::Waiting | Self::Completing => Some(true),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Disabling => "disabling",
            Self::Waiting => "waiting",
            Self::Completing => "completing",
        }
    }
}

/// Outcome of one sequencer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerStep {
    /// Phase executed this tick.
    pub phase: RecoveryPhase,
    /// A request was accepted this tick.
    pub accepted: bool,
    /// Latches were cleared this tick.
    pub reset_completed: bool,
}

/// Recovery sequence manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetSequencer {
    /// Sticky recovery-in-progress flag.
    requested: bool,
    /// Motor enable level held between phases.
    motor_enable: bool,
    phase: RecoveryPhase,
}

impl Default for ResetSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetSequencer {
    /// Idle, motors enabled.
    pub const fn new() -> Self {
        Self {
            requested: false,
            motor_enable: true,
            phase: RecoveryPhase::Idle,
        }
    }

    /// Recovery request latched and not yet completed.
    #[inline]
    pub const fn in_progress(&self) -> bool {
        self.requested
    }

    #[inline]
    pub const fn phase(&self) -> RecoveryPhase {
        self.phase
    }

    /// Motor enable level, common to all axes.
    #[inline]
    pub const fn motor_enable(&self) -> bool {
        self.motor_enable
    }

    /// Tick the sequence.
    ///
    /// `request` is the operator request OR'd with the automatic
    /// button-release trigger; it only has an effect while idle.
    pub fn tick(
        &mut self,
        request: bool,
        timers: &mut TimerSet,
        latches: &mut LatchBank,
        timing: &TimingConfig,
    ) -> SequencerStep {
        let mut accepted = false;
        if !self.requested && request {
            self.requested = true;
            timers.since_enable_request.restart();
            accepted = true;
            info!("E-Stop recovery requested");
        }

        if !self.requested {
            self.phase = RecoveryPhase::Idle;
            return SequencerStep {
                phase: self.phase,
                accepted,
                reset_completed: false,
            };
        }

        self.phase = RecoveryPhase::at(timers.since_enable_request.elapsed(), timing);
        if let Some(level) = self.phase.motor_enable() {
            self.motor_enable = level;
        }

        let reset_completed = self.phase == RecoveryPhase::Completing;
        if reset_completed {
            // Latches that are still live will re-latch and be reported again.
            latches.clear();
            self.requested = false;
            info!("E-Stop recovery complete, latches cleared");
        }

        SequencerStep {
            phase: self.phase,
            accepted,
            reset_completed,
        }
    }
}
