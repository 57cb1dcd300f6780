//! Integration test: stop decision and output registers.

use estop_common::supervisor::fault::FaultSource;
use estop_common::supervisor::signals::SupervisorInputs;

use super::helpers::{request, run_healthy, settled, supervisor, with};

#[test]
fn button_press_stops_same_tick() {
    let mut sup = settled();
    let report = sup.tick(&with(|i| i.button_pressed = true));

    assert!(report.stop);
    assert!(report.stop_entered);
    assert!(!report.outputs.enable);
    assert!(!report.outputs.machine_on);
    assert_eq!(sup.snapshot().latched, FaultSource::STOP_BUTTON);

    // Still stopped after release, until a recovery runs.
    let report = run_healthy(&mut sup, 500).unwrap();
    assert!(report.stop);
    assert!(!report.outputs.enable);
}

#[test]
fn unhome_after_delay() {
    let mut sup = settled();
    let pressed = with(|i| i.button_pressed = true);

    for rel in 0..=150u32 {
        let report = sup.tick(&pressed);
        assert_eq!(report.outputs.unhome, rel > 100, "unhome at rel {rel}");
    }
}

#[test]
fn unhome_persists_until_recovery() {
    let mut sup = settled();

    // One tick without permission enters the stopped state.
    let report = sup.tick(&with(|i| i.run_permission = false));
    assert!(report.stop_entered);

    for rel in 1..=200u32 {
        let report = run_healthy(&mut sup, 1).unwrap();
        assert!(!report.stop);
        assert!(report.outputs.enable);
        assert_eq!(report.outputs.unhome, rel > 100, "unhome at rel {rel}");
    }
    assert!(sup.snapshot().stopped);

    sup.tick(&request());
    let report = run_healthy(&mut sup, 1001).unwrap();
    assert!(report.reset_completed);
    assert!(!report.outputs.unhome);
    assert!(!sup.snapshot().stopped);
}

#[test]
fn short_stop_near_recovery_end_never_unhomes() {
    let mut sup = settled();
    sup.tick(&request());
    run_healthy(&mut sup, 959);

    // rel 960: one tick without permission.
    let report = sup.tick(&with(|i| i.run_permission = false));
    assert!(report.stop);
    assert!(report.stop_entered);

    for rel in 961..=2000u32 {
        let report = run_healthy(&mut sup, 1).unwrap();
        assert!(!report.outputs.unhome, "unhome at rel {rel}");
        assert_eq!(report.reset_completed, rel == 1001);
    }
    assert!(!sup.snapshot().stopped);
}

#[test]
fn power_always_on() {
    let mut sup = supervisor();
    let mut inputs = SupervisorInputs::default();
    for n in 0..6000u32 {
        inputs.button_pressed = n % 700 < 20;
        inputs.drive_fault[0] = n % 333 == 0;
        inputs.run_permission = n % 50 != 0;
        inputs.user_request_enable = n % 1200 == 0;
        let report = sup.tick(&inputs);
        assert!(report.outputs.power);
    }
}

#[test]
fn permission_loss_does_not_latch() {
    let mut sup = settled();
    let denied = with(|i| i.run_permission = false);
    for _ in 0..10 {
        let report = sup.tick(&denied);
        assert!(report.stop);
        assert!(!report.outputs.enable);
        assert!(report.newly_latched.is_empty());
    }

    let report = run_healthy(&mut sup, 1).unwrap();
    assert!(!report.stop);
    assert!(report.outputs.enable);
    assert!(sup.snapshot().latched.is_empty());
}

#[test]
fn machine_on_requires_request_delay() {
    let mut sup = settled();
    // Startup never ran a recovery, but the request timer has long passed.
    let report = run_healthy(&mut sup, 1).unwrap();
    assert!(report.outputs.machine_on);

    let report = sup.tick(&request());
    assert!(!report.outputs.machine_on);
    let report = run_healthy(&mut sup, 1100).unwrap();
    assert!(!report.outputs.machine_on);
    let report = run_healthy(&mut sup, 1).unwrap();
    assert!(report.outputs.machine_on);
}

#[test]
fn motor_enables_hold_when_idle() {
    let mut sup = settled();
    let report = run_healthy(&mut sup, 1).unwrap();
    assert_eq!(report.outputs.motor_enable, [true; 5]);

    // Faults and stops never touch the motor enables outside a recovery.
    let report = sup.tick(&with(|i| i.following_error[3] = true));
    assert!(report.stop);
    assert_eq!(report.outputs.motor_enable, [true; 5]);
}
