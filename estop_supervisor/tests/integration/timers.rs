//! Integration test: cycle timer saturation and restarts.

use estop_common::supervisor::config::TimingConfig;
use estop_common::supervisor::fault::FaultSource;
use estop_common::supervisor::signals::{Axis, SupervisorInputs};
use estop_supervisor::supervisor::EstopSupervisor;
use estop_supervisor::timers::TimerValues;

use super::helpers::{run_healthy, settled, supervisor, with};

#[test]
fn timers_saturate_at_ceiling() {
    let mut sup = supervisor();
    // Button pushed and released once so every timer has been started.
    sup.tick(&with(|i| i.button_pressed = true));
    run_healthy(&mut sup, 100_000);

    assert_eq!(
        sup.snapshot().timers,
        TimerValues {
            since_startup: 6000,
            since_button_release: 6000,
            since_enable_request: 6000,
            since_stop_entry: 6000,
        }
    );
}

#[test]
fn button_release_is_one_shot() {
    let mut sup = settled();
    let pressed = with(|i| i.button_pressed = true);
    let released = |sup: &EstopSupervisor| sup.snapshot().timers.since_button_release;

    sup.tick(&pressed);
    sup.tick(&SupervisorInputs::healthy());
    assert_eq!(released(&sup), 1);

    run_healthy(&mut sup, 10);
    assert_eq!(released(&sup), 11);

    // Second press/release before any recovery: no restart.
    sup.tick(&pressed);
    assert_eq!(released(&sup), 12);
    sup.tick(&SupervisorInputs::healthy());
    assert_eq!(released(&sup), 13);

    run_healthy(&mut sup, 20);
    assert_eq!(released(&sup), 33);
}

#[test]
fn startup_timer_never_restarts() {
    let mut sup = supervisor();
    run_healthy(&mut sup, 50);
    sup.tick(&with(|i| i.button_pressed = true));
    sup.tick(&with(|i| i.user_request_enable = true));
    assert_eq!(sup.snapshot().timers.since_startup, 52);
}

#[test]
fn custom_ceiling_and_windows() {
    let timing = TimingConfig {
        timer_ceiling: 500,
        unhome_delay: 10,
        machine_on_delay: 110,
        startup_grace: 200,
        disable_duration: 10,
        reset_duration: 100,
    };
    let mut sup = EstopSupervisor::new(timing).unwrap();

    let fault = with(|i| i.drive_fault[Axis::B.index()] = true);

    // Still inside the shorter grace window.
    run_healthy(&mut sup, 200);
    assert!(sup.tick(&fault).newly_latched.is_empty());

    let report = sup.tick(&fault);
    assert_eq!(report.newly_latched, FaultSource::DRIVE_B);

    sup.tick(&with(|i| i.user_request_enable = true));
    let report = run_healthy(&mut sup, 101).unwrap();
    assert!(report.reset_completed);
    assert!(!report.stop);

    run_healthy(&mut sup, 10_000);
    assert_eq!(sup.snapshot().timers.max(), 500);
    assert_eq!(sup.snapshot().timers.since_startup, 500);
}
