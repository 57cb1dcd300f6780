//! Per-tick E-Stop supervisor.
//!
//! Owns all safety state and evaluates one tick per call:
//!
//! 1. aggregate raw inputs into instantaneous fault sources
//! 2. update the latches under the startup/button guard
//! 3. run the recovery sequence
//! 4. derive stop, enable, machine-on, motor enables and unhome
//! 5. advance the timers
//!
//! [`EstopSupervisor::tick`] never blocks and never allocates. The caller is
//! the host's fixed-period scheduler.

use estop_common::config::ConfigError;
use estop_common::supervisor::config::TimingConfig;
use estop_common::supervisor::fault::FaultSource;
use estop_common::supervisor::signals::{SupervisorInputs, SupervisorOutputs};
use tracing::error;

use crate::aggregator::{InstantFaults, aggregate};
use crate::journal::{FaultJournal, LatchEvent};
use crate::latch::LatchBank;
use crate::outputs::{DeriveInput, OutputDeriver};
use crate::sequencer::{RecoveryPhase, ResetSequencer};
use crate::timers::{TimerSet, TimerValues};

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Output registers for this tick.
    pub outputs: SupervisorOutputs,
    /// Derived stop condition.
    pub stop: bool,
    /// Sources that latched this tick.
    pub newly_latched: FaultSource,
    /// Recovery phase executed this tick.
    pub phase: RecoveryPhase,
    /// A recovery request was accepted this tick.
    pub recovery_accepted: bool,
    /// The recovery sequence cleared the latches this tick.
    pub reset_completed: bool,
    /// `stopped` went false→true this tick.
    pub stop_entered: bool,
}

/// Read-only view of the supervisor state after the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorSnapshot {
    /// Ticks evaluated so far.
    pub tick: u64,
    pub instantaneous: FaultSource,
    pub latched: FaultSource,
    pub latched_spindle_error_code: i32,
    pub button_released: bool,
    pub timers: TimerValues,
    pub phase: RecoveryPhase,
    pub stop: bool,
    pub stopped: bool,
    pub outputs: SupervisorOutputs,
}

/// E-Stop safety interlock supervisor.
#[derive(Debug, Clone)]
pub struct EstopSupervisor {
    timing: TimingConfig,
    timers: TimerSet,
    latches: LatchBank,
    sequencer: ResetSequencer,
    deriver: OutputDeriver,
    journal: FaultJournal,
    instant: InstantFaults,
    outputs: SupervisorOutputs,
    stop: bool,
    tick: u64,
}

impl EstopSupervisor {
    /// Create a supervisor in its power-on state.
    pub fn new(timing: TimingConfig) -> Result<Self, ConfigError> {
        timing.validate()?;
        Ok(Self {
            timing,
            timers: TimerSet::new(timing.timer_ceiling),
            latches: LatchBank::new(),
            sequencer: ResetSequencer::new(),
            deriver: OutputDeriver::new(),
            journal: FaultJournal::new(),
            instant: InstantFaults::default(),
            outputs: SupervisorOutputs::default(),
            stop: false,
            tick: 0,
        })
    }

    #[inline]
    pub const fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// Output registers from the last tick.
    #[inline]
    pub const fn outputs(&self) -> &SupervisorOutputs {
        &self.outputs
    }

    #[inline]
    pub const fn journal(&self) -> &FaultJournal {
        &self.journal
    }

    #[inline]
    pub fn journal_mut(&mut self) -> &mut FaultJournal {
        &mut self.journal
    }

    pub fn snapshot(&self) -> SupervisorSnapshot {
        SupervisorSnapshot {
            tick: self.tick,
            instantaneous: self.instant.sources,
            latched: self.latches.latched(),
            latched_spindle_error_code: self.latches.spindle_error_code(),
            button_released: self.latches.button_released(),
            timers: self.timers.values(),
            phase: self.sequencer.phase(),
            stop: self.stop,
            stopped: self.deriver.stopped(),
            outputs: self.outputs,
        }
    }

    /// Evaluate one control tick.
    pub fn tick(&mut self, inputs: &SupervisorInputs) -> TickReport {
        let timing = self.timing;

        let instant = aggregate(inputs);

        let allow = self
            .latches
            .latching_allowed(inputs.button_pressed, &self.timers, &timing);
        let update = self.latches.update(&instant, allow);
        if update.release_edge {
            self.timers.since_button_release.restart();
        }
        self.report_latches(update.newly_latched);

        let any_latched = self.latches.any_latched();
        let auto_request = self.latches.button_released()
            && self.timers.since_button_release.exceeds(timing.startup_grace);
        let step = self.sequencer.tick(
            inputs.user_request_enable || auto_request,
            &mut self.timers,
            &mut self.latches,
            &timing,
        );

        let derived = self.deriver.derive(
            &DeriveInput {
                instant_fault: instant.is_faulted(),
                run_permission: inputs.run_permission,
                any_latched,
                reset_completed: step.reset_completed,
                recovery_in_progress: self.sequencer.in_progress(),
                motor_enable: self.sequencer.motor_enable(),
            },
            &mut self.timers,
            &timing,
        );

        self.timers.advance_all();
        self.instant = instant;
        self.outputs = derived.outputs;
        self.stop = derived.stop;
        self.tick += 1;

        TickReport {
            outputs: derived.outputs,
            stop: derived.stop,
            newly_latched: update.newly_latched,
            phase: step.phase,
            recovery_accepted: step.accepted,
            reset_completed: step.reset_completed,
            stop_entered: derived.stop_entered,
        }
    }

    /// Log and journal each false→true latch transition.
    fn report_latches(&mut self, newly: FaultSource) {
        for source in newly.iter() {
            let spindle_error_code = if source == FaultSource::SPINDLE_ERROR {
                self.latches.spindle_error_code()
            } else {
                0
            };
            let event = LatchEvent {
                tick: self.tick,
                source,
                spindle_error_code,
            };
            error!(
                tick = self.tick,
                axis = ?source.axis(),
                code = spindle_error_code,
                "E-Stop: {}",
                source.describe()
            );
            self.journal.record(event);
        }
    }
}
