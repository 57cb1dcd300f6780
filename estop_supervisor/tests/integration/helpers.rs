//! Shared fixtures for the integration tests.

use estop_common::supervisor::config::TimingConfig;
use estop_common::supervisor::signals::SupervisorInputs;
use estop_supervisor::supervisor::{EstopSupervisor, TickReport};

/// Healthy ticks after which every latch guard window has passed.
pub const SETTLE_TICKS: u32 = 3001;

pub fn supervisor() -> EstopSupervisor {
    EstopSupervisor::new(TimingConfig::default()).unwrap()
}

/// Supervisor past startup grace, running, nothing latched.
pub fn settled() -> EstopSupervisor {
    let mut sup = supervisor();
    run_healthy(&mut sup, SETTLE_TICKS);
    let snap = sup.snapshot();
    assert!(!snap.stop);
    assert!(!snap.stopped);
    assert!(snap.latched.is_empty());
    sup
}

/// Run `n` all-clear ticks, returning the last report.
pub fn run_healthy(sup: &mut EstopSupervisor, n: u32) -> Option<TickReport> {
    let inputs = SupervisorInputs::healthy();
    (0..n).map(|_| sup.tick(&inputs)).last()
}

pub fn with(f: impl FnOnce(&mut SupervisorInputs)) -> SupervisorInputs {
    let mut inputs = SupervisorInputs::healthy();
    f(&mut inputs);
    inputs
}

/// Healthy inputs with a one-tick recovery request.
pub fn request() -> SupervisorInputs {
    with(|i| i.user_request_enable = true)
}
