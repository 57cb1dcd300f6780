//! Scripted input scenarios for offline replay.
//!
//! A scenario is a TOML timeline of input changes. Each `[[step]]` applies at
//! tick `at` and its values hold until a later step changes them. Inputs
//! start all-clear with run permission granted.
//!
//! ```toml
//! ticks = 5000
//!
//! [[step]]
//! at = 3500
//! drive_fault = [0]
//!
//! [[step]]
//! at = 3510
//! drive_fault = []
//! pulse_user_request = true
//! ```

use std::path::{Path, PathBuf};

use estop_common::consts::AXIS_COUNT;
use estop_common::supervisor::config::TimingConfig;
use estop_common::supervisor::signals::{Axis, SupervisorInputs};
use serde::Deserialize;
use thiserror::Error;

use crate::supervisor::{EstopSupervisor, TickReport};

/// Scenario loading/validation error.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(String),

    #[error("step {index}: {reason}")]
    InvalidStep { index: usize, reason: String },
}

/// One timeline entry. Unset fields leave the input unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioStep {
    /// Tick at which the changes apply.
    pub at: u64,
    /// Axis indices with a drive fault; all others cleared.
    pub drive_fault: Option<Vec<usize>>,
    /// Axis indices with a following error; all others cleared.
    pub following_error: Option<Vec<usize>>,
    pub button: Option<bool>,
    pub spindle_error_code: Option<i32>,
    pub spindle_modbus_ok: Option<bool>,
    pub ignore_com_errors: Option<bool>,
    pub user_request_enable: Option<bool>,
    pub run_permission: Option<bool>,
    /// Assert the recovery request for this tick only.
    #[serde(default)]
    pub pulse_user_request: bool,
}

impl ScenarioStep {
    fn apply(&self, inputs: &mut SupervisorInputs) {
        if let Some(axes) = &self.drive_fault {
            inputs.drive_fault = axis_mask(axes);
        }
        if let Some(axes) = &self.following_error {
            inputs.following_error = axis_mask(axes);
        }
        if let Some(v) = self.button {
            inputs.button_pressed = v;
        }
        if let Some(v) = self.spindle_error_code {
            inputs.spindle_error_code = v;
        }
        if let Some(v) = self.spindle_modbus_ok {
            inputs.spindle_modbus_ok = v;
        }
        if let Some(v) = self.ignore_com_errors {
            inputs.ignore_com_errors = v;
        }
        if let Some(v) = self.user_request_enable {
            inputs.user_request_enable = v;
        }
        if let Some(v) = self.run_permission {
            inputs.run_permission = v;
        }
    }

    fn axes(&self) -> impl Iterator<Item = usize> + '_ {
        self.drive_fault
            .iter()
            .chain(self.following_error.iter())
            .flatten()
            .copied()
    }
}

/// Indices that do not name an axis are ignored; `validate` reports them.
fn axis_mask(axes: &[usize]) -> [bool; AXIS_COUNT] {
    let mut mask = [false; AXIS_COUNT];
    for axis in axes.iter().filter_map(|&i| Axis::from_index(i)) {
        mask[axis.index()] = true;
    }
    mask
}

/// Input timeline for a replay run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Total ticks to run.
    pub ticks: u64,
    /// Optional timing override for this scenario.
    #[serde(default)]
    pub timing: Option<TimingConfig>,
    #[serde(default, rename = "step")]
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Read and validate a scenario file.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let content = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a scenario document.
    pub fn from_toml(content: &str) -> Result<Self, ScenarioError> {
        let scenario: Self =
            toml::from_str(content).map_err(|e| ScenarioError::Parse(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Steps sorted by tick, inside the run, with valid axis indices.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let mut last_at = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if step.at < last_at {
                return Err(ScenarioError::InvalidStep {
                    index,
                    reason: format!("at {} is before previous step at {last_at}", step.at),
                });
            }
            if step.at >= self.ticks {
                return Err(ScenarioError::InvalidStep {
                    index,
                    reason: format!("at {} is past the end of the run ({} ticks)", step.at, self.ticks),
                });
            }
            if let Some(axis) = step.axes().find(|&a| a >= AXIS_COUNT) {
                return Err(ScenarioError::InvalidStep {
                    index,
                    reason: format!("axis index {axis} out of range [0, {AXIS_COUNT})"),
                });
            }
            last_at = step.at;
        }
        Ok(())
    }

    /// Drive `supervisor` through the timeline, one call per tick.
    pub fn run<F>(&self, supervisor: &mut EstopSupervisor, mut on_tick: F)
    where
        F: FnMut(u64, &SupervisorInputs, &TickReport),
    {
        let mut inputs = SupervisorInputs::healthy();
        let mut next = 0;

        for tick in 0..self.ticks {
            let mut pulse = false;
            while let Some(step) = self.steps.get(next).filter(|s| s.at == tick) {
                step.apply(&mut inputs);
                pulse |= step.pulse_user_request;
                next += 1;
            }

            let mut tick_inputs = inputs;
            tick_inputs.user_request_enable |= pulse;

            let report = supervisor.tick(&tick_inputs);
            on_tick(tick, &tick_inputs, &report);
        }
    }
}
