//! Supervisor configuration loading with validation.
//!
//! Loads [`SupervisorConfig`] from TOML, falls back to built-in defaults when
//! no file is given, and resolves the effective timing for a run.

use std::path::Path;

use estop_common::config::{ConfigError, ConfigLoader};
use estop_common::supervisor::config::{SupervisorConfig, TimingConfig};
use tracing::{debug, info};

use crate::scenario::Scenario;

/// Load and validate a supervisor config file.
pub fn load_config(path: &Path) -> Result<SupervisorConfig, ConfigError> {
    let config = SupervisorConfig::load(path)?;
    config.validate()?;
    info!(
        "Loaded config {} (service={})",
        path.display(),
        config.shared.service_name
    );
    Ok(config)
}

/// Load `path` if given, otherwise use the built-in defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<SupervisorConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            debug!("No config file given, using defaults");
            Ok(SupervisorConfig::default())
        }
    }
}

/// Timing for a replay: the scenario override wins over the config file.
pub fn effective_timing(
    config: &SupervisorConfig,
    scenario: &Scenario,
) -> Result<TimingConfig, ConfigError> {
    let timing = scenario.timing.unwrap_or(config.timing);
    timing.validate()?;
    Ok(timing)
}
