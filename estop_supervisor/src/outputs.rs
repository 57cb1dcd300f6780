//! Stop decision and output registers.
//!
//! Runs last in the tick, after aggregation, latching and the recovery
//! sequence. Owns the sticky `stopped` flag.

use estop_common::consts::AXIS_COUNT;
use estop_common::supervisor::config::TimingConfig;
use estop_common::supervisor::signals::SupervisorOutputs;
use tracing::warn;

use crate::timers::TimerSet;

/// Everything the deriver needs from the earlier stages of the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeriveInput {
    /// Any instantaneous fault source active.
    pub instant_fault: bool,
    /// External run permission.
    pub run_permission: bool,
    /// Any latch set, taken before the recovery clear.
    pub any_latched: bool,
    /// The recovery sequence cleared the latches this tick.
    pub reset_completed: bool,
    /// Recovery request latched after this tick's sequencer step.
    pub recovery_in_progress: bool,
    /// Motor enable level from the sequencer.
    pub motor_enable: bool,
}

/// Result of one derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Derived {
    pub outputs: SupervisorOutputs,
    /// Stop condition this tick.
    pub stop: bool,
    /// `stopped` went false→true this tick.
    pub stop_entered: bool,
}

/// Stop/enable derivation with the sticky `stopped` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputDeriver {
    stopped: bool,
}

impl OutputDeriver {
    pub const fn new() -> Self {
        Self { stopped: false }
    }

    /// True from the first stop tick until a recovery completes.
    #[inline]
    pub const fn stopped(&self) -> bool {
        self.stopped
    }

    pub fn derive(
        &mut self,
        input: &DeriveInput,
        timers: &mut TimerSet,
        timing: &TimingConfig,
    ) -> Derived {
        if input.reset_completed {
            self.stopped = false;
        }

        let stop = !(!input.instant_fault
            && input.run_permission
            && (!input.any_latched || input.reset_completed));

        let stop_entered = stop && !self.stopped;
        if stop_entered {
            timers.since_stop_entry.restart();
            self.stopped = true;
            warn!(
                instant_fault = input.instant_fault,
                run_permission = input.run_permission,
                latched = input.any_latched,
                "E-Stop asserted"
            );
        }

        let enable = !stop;
        let outputs = SupervisorOutputs {
            recovery_in_progress: input.recovery_in_progress,
            enable,
            power: true,
            machine_on: enable && timers.since_enable_request.exceeds(timing.machine_on_delay),
            motor_enable: [input.motor_enable; AXIS_COUNT],
            unhome: self.stopped && timers.since_stop_entry.exceeds(timing.unhome_delay),
        };

        Derived {
            outputs,
            stop,
            stop_entered,
        }
    }
}
