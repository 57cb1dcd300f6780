//! Integration test: scenario files replayed through the supervisor.

use std::io::Write;

use estop_common::config::ConfigLoader;
use estop_common::supervisor::config::{SupervisorConfig, TimingConfig};
use estop_common::supervisor::fault::FaultSource;
use estop_supervisor::config::effective_timing;
use estop_supervisor::scenario::{Scenario, ScenarioError};
use estop_supervisor::supervisor::{EstopSupervisor, TickReport};
use tempfile::NamedTempFile;

const RECOVERY: &str = include_str!("../../config/scenarios/recovery.toml");
const BUTTON_RELEASE: &str = include_str!("../../config/scenarios/button_release.toml");
const SAMPLE_CONFIG: &str = include_str!("../../config/estop.toml");

fn replay(scenario: &Scenario) -> (EstopSupervisor, Vec<TickReport>) {
    let mut sup = EstopSupervisor::new(scenario.timing.unwrap_or_default()).unwrap();
    let mut reports = Vec::with_capacity(scenario.ticks as usize);
    scenario.run(&mut sup, |_, _, report| reports.push(*report));
    (sup, reports)
}

fn first_tick(reports: &[TickReport], pred: impl Fn(&TickReport) -> bool) -> Option<usize> {
    reports.iter().position(pred)
}

#[test]
fn sample_config_matches_defaults() {
    let config = SupervisorConfig::from_toml(SAMPLE_CONFIG).unwrap();
    config.validate().unwrap();
    assert_eq!(config, SupervisorConfig::default());
}

#[test]
fn recovery_scenario_timeline() {
    let scenario = Scenario::from_toml(RECOVERY).unwrap();
    let (sup, reports) = replay(&scenario);
    assert_eq!(reports.len(), 5000);

    assert_eq!(first_tick(&reports, |r| r.stop), Some(3500));
    assert_eq!(reports[3500].newly_latched, FaultSource::DRIVE_X);
    assert_eq!(first_tick(&reports, |r| r.recovery_accepted), Some(3600));
    assert_eq!(reports[3699].outputs.motor_enable, [false; 5]);
    assert_eq!(reports[3700].outputs.motor_enable, [true; 5]);
    assert_eq!(first_tick(&reports, |r| r.reset_completed), Some(4601));
    assert!(reports[4600].stop);
    assert!(!reports[4601].stop);

    let machine_on = first_tick(&reports[4601..], |r| r.outputs.machine_on).map(|i| i + 4601);
    assert_eq!(machine_on, Some(4701));

    // The stop lasted long enough to unhome; recovery clears it.
    assert!(reports[3601].outputs.unhome);
    assert!(!reports[4999].outputs.unhome);

    assert_eq!(sup.journal().len(), 1);
    assert!(sup.snapshot().latched.is_empty());
}

#[test]
fn button_release_scenario_recovers_itself() {
    let scenario = Scenario::from_toml(BUTTON_RELEASE).unwrap();
    let (sup, reports) = replay(&scenario);

    assert_eq!(reports[3200].newly_latched, FaultSource::STOP_BUTTON);
    assert_eq!(first_tick(&reports, |r| r.recovery_accepted), Some(6251));
    assert_eq!(first_tick(&reports, |r| r.reset_completed), Some(7252));
    assert!(!reports[7999].stop);
    assert!(!sup.snapshot().button_released);
}

#[test]
fn scenario_timing_override_applies() {
    let scenario = Scenario::from_toml(
        r#"
ticks = 400

[timing]
timer_ceiling = 500
unhome_delay = 10
machine_on_delay = 110
startup_grace = 200
disable_duration = 10
reset_duration = 100

[[step]]
at = 250
following_error = [2]

[[step]]
at = 251
following_error = []

[[step]]
at = 260
pulse_user_request = true
"#,
    )
    .unwrap();

    let timing = effective_timing(&SupervisorConfig::default(), &scenario).unwrap();
    assert_eq!(timing.reset_duration, 100);

    let (_, reports) = replay(&scenario);
    assert_eq!(reports[250].newly_latched, FaultSource::FOLLOWING_Z);
    assert_eq!(first_tick(&reports, |r| r.reset_completed), Some(361));
}

#[test]
fn load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(RECOVERY.as_bytes()).unwrap();
    file.flush().unwrap();

    let scenario = Scenario::load(file.path()).unwrap();
    assert_eq!(scenario.ticks, 5000);
    assert_eq!(scenario.steps.len(), 3);
    assert_eq!(scenario.timing, None);
}

#[test]
fn missing_file_is_io_error() {
    let err = Scenario::load(std::path::Path::new("/nonexistent/scenario.toml")).unwrap_err();
    assert!(matches!(err, ScenarioError::Io { .. }));
}

#[test]
fn step_past_end_rejected() {
    let err = Scenario::from_toml("ticks = 10\n[[step]]\nat = 10\n").unwrap_err();
    assert!(matches!(err, ScenarioError::InvalidStep { index: 0, .. }));
}

#[test]
fn default_timing_used_without_override() {
    let scenario = Scenario::from_toml(RECOVERY).unwrap();
    let timing = effective_timing(&SupervisorConfig::default(), &scenario).unwrap();
    assert_eq!(timing, TimingConfig::default());
}
