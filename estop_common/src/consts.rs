//! System-wide constants for the E-Stop workspace.
//!
//! Single source of truth for the axis count and the default cycle-count
//! thresholds shared by every crate in the workspace.
//!
//! All thresholds are expressed in control cycles, not wall-clock time.

use static_assertions::const_assert;

/// Number of supervised axes (X, Y, Z, B, C).
pub const AXIS_COUNT: usize = 5;

/// Default ceiling for every supervisor timer [cycles].
pub const TIMER_CEILING_DEFAULT: u32 = 6000;

/// Largest accepted timer ceiling [cycles].
pub const TIMER_CEILING_MAX: u32 = 1_000_000;

/// Default stop duration after which homed status is dropped [cycles].
pub const UNHOME_DELAY_DEFAULT: u32 = 100;

/// Default delay between recovery acceptance and machine-on [cycles].
pub const MACHINE_ON_DELAY_DEFAULT: u32 = 1100;

/// Default grace window after startup and after button release [cycles].
pub const STARTUP_GRACE_DEFAULT: u32 = 3000;

/// Default length of the forced motor-disable phase [cycles].
pub const DISABLE_DURATION_DEFAULT: u32 = 100;

/// Default time from recovery acceptance to latch clear [cycles].
pub const RESET_DURATION_DEFAULT: u32 = 1000;

/// Capacity of the latch-event journal.
pub const JOURNAL_CAPACITY: usize = 32;

const_assert!(DISABLE_DURATION_DEFAULT <= RESET_DURATION_DEFAULT);
const_assert!(RESET_DURATION_DEFAULT < MACHINE_ON_DELAY_DEFAULT);
const_assert!(MACHINE_ON_DELAY_DEFAULT < TIMER_CEILING_DEFAULT);
const_assert!(STARTUP_GRACE_DEFAULT < TIMER_CEILING_DEFAULT);
const_assert!(UNHOME_DELAY_DEFAULT < TIMER_CEILING_DEFAULT);
const_assert!(TIMER_CEILING_DEFAULT <= TIMER_CEILING_MAX);
const_assert!(AXIS_COUNT <= 8);
