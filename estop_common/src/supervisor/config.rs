//! Configuration structures for the E-Stop supervisor.
//!
//! All thresholds are control-cycle counts. Every field has a serde default so
//! a config file only needs to name what it overrides.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SharedConfig};
use crate::consts::{
    DISABLE_DURATION_DEFAULT, MACHINE_ON_DELAY_DEFAULT, RESET_DURATION_DEFAULT,
    STARTUP_GRACE_DEFAULT, TIMER_CEILING_DEFAULT, TIMER_CEILING_MAX, UNHOME_DELAY_DEFAULT,
};

// ─── Top-Level Config ───────────────────────────────────────────────

/// Top-level supervisor configuration file.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// service_name = "estop-01"
///
/// [timing]
/// startup_grace = 2000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupervisorConfig {
    /// Logging and instance identity.
    #[serde(default)]
    pub shared: SharedConfig,

    /// Cycle-count thresholds.
    #[serde(default)]
    pub timing: TimingConfig,
}

impl SupervisorConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.timing.validate()
    }
}

// ─── Timing ─────────────────────────────────────────────────────────

/// Supervisor thresholds [cycles].
///
/// Immutable once the supervisor is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Saturation ceiling shared by all four timers (default: 6000).
    #[serde(default = "default_timer_ceiling")]
    pub timer_ceiling: u32,

    /// Continuous stop duration before `unhome` asserts (default: 100).
    #[serde(default = "default_unhome_delay")]
    pub unhome_delay: u32,

    /// Delay from recovery acceptance to `machine_on` (default: 1100).
    #[serde(default = "default_machine_on_delay")]
    pub machine_on_delay: u32,

    /// Latch hold-off after startup and after button release (default: 3000).
    /// Also the release time before an automatic recovery attempt.
    #[serde(default = "default_startup_grace")]
    pub startup_grace: u32,

    /// Forced motor-disable phase of the recovery sequence (default: 100).
    #[serde(default = "default_disable_duration")]
    pub disable_duration: u32,

    /// Recovery acceptance to latch clear (default: 1000).
    #[serde(default = "default_reset_duration")]
    pub reset_duration: u32,
}

fn default_timer_ceiling() -> u32 {
    TIMER_CEILING_DEFAULT
}
fn default_unhome_delay() -> u32 {
    UNHOME_DELAY_DEFAULT
}
fn default_machine_on_delay() -> u32 {
    MACHINE_ON_DELAY_DEFAULT
}
fn default_startup_grace() -> u32 {
    STARTUP_GRACE_DEFAULT
}
fn default_disable_duration() -> u32 {
    DISABLE_DURATION_DEFAULT
}
fn default_reset_duration() -> u32 {
    RESET_DURATION_DEFAULT
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            timer_ceiling: TIMER_CEILING_DEFAULT,
            unhome_delay: UNHOME_DELAY_DEFAULT,
            machine_on_delay: MACHINE_ON_DELAY_DEFAULT,
            startup_grace: STARTUP_GRACE_DEFAULT,
            disable_duration: DISABLE_DURATION_DEFAULT,
            reset_duration: RESET_DURATION_DEFAULT,
        }
    }
}

impl TimingConfig {
    /// Validate threshold bounds and ordering.
    ///
    /// Thresholds are compared with `>` against saturating timers, so each
    /// one must sit strictly below the ceiling or the condition never fires.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer_ceiling == 0 || self.timer_ceiling > TIMER_CEILING_MAX {
            return Err(ConfigError::ValidationError(format!(
                "timer_ceiling {} out of range [1, {}]",
                self.timer_ceiling, TIMER_CEILING_MAX
            )));
        }

        for (name, value) in [
            ("unhome_delay", self.unhome_delay),
            ("machine_on_delay", self.machine_on_delay),
            ("startup_grace", self.startup_grace),
            ("disable_duration", self.disable_duration),
            ("reset_duration", self.reset_duration),
        ] {
            if value >= self.timer_ceiling {
                return Err(ConfigError::ValidationError(format!(
                    "{name} {value} must be below timer_ceiling {}",
                    self.timer_ceiling
                )));
            }
        }

        if self.disable_duration > self.reset_duration {
            return Err(ConfigError::ValidationError(format!(
                "disable_duration {} exceeds reset_duration {}",
                self.disable_duration, self.reset_duration
            )));
        }
        Ok(())
    }
}
