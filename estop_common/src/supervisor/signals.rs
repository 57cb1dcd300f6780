//! Signal registers at the supervisor boundary.
//!
//! The external wiring layer samples these once per tick. Inputs are raw
//! bits/codes from the drives, spindle VFD and the physical button; outputs
//! go to the motion controller and the per-axis drive enables.

use serde::{Deserialize, Serialize};

use crate::consts::AXIS_COUNT;

/// Supervised machine axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
    B = 3,
    C = 4,
}

impl Axis {
    /// All axes in register order.
    pub const ALL: [Axis; AXIS_COUNT] = [Axis::X, Axis::Y, Axis::Z, Axis::B, Axis::C];

    /// Register index of this axis.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            3 => Some(Self::B),
            4 => Some(Self::C),
            _ => None,
        }
    }

    /// Single-letter axis name.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            Self::X => 'X',
            Self::Y => 'Y',
            Self::Z => 'Z',
            Self::B => 'B',
            Self::C => 'C',
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Raw input registers sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorInputs {
    /// Drive-reported fault per axis.
    pub drive_fault: [bool; AXIS_COUNT],
    /// Following-error flag per joint.
    pub following_error: [bool; AXIS_COUNT],
    /// Ignore communication-only faults (drive faults, spindle code and link).
    pub ignore_com_errors: bool,
    /// Physical E-Stop button state.
    pub button_pressed: bool,
    /// Error code reported by the spindle VFD (0 = none).
    pub spindle_error_code: i32,
    /// Modbus link to the spindle VFD is healthy.
    pub spindle_modbus_ok: bool,
    /// Operator asked to recover from E-Stop.
    pub user_request_enable: bool,
    /// External run permission from the motion controller.
    pub run_permission: bool,
}

impl Default for SupervisorInputs {
    /// Power-on register values: no faults, link healthy, no permission.
    fn default() -> Self {
        Self {
            drive_fault: [false; AXIS_COUNT],
            following_error: [false; AXIS_COUNT],
            ignore_com_errors: false,
            button_pressed: false,
            spindle_error_code: 0,
            spindle_modbus_ok: true,
            user_request_enable: false,
            run_permission: false,
        }
    }
}

impl SupervisorInputs {
    /// All-clear inputs with run permission granted.
    pub fn healthy() -> Self {
        Self {
            run_permission: true,
            ..Self::default()
        }
    }
}

/// Output registers written once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorOutputs {
    /// Recovery sequence in progress (also wired as the external reset trigger).
    pub recovery_in_progress: bool,
    /// Not in E-Stop.
    pub enable: bool,
    /// Reserved power relay output, always asserted.
    pub power: bool,
    /// Machine-on request, delayed after enable.
    pub machine_on: bool,
    /// Per-axis motor enable.
    pub motor_enable: [bool; AXIS_COUNT],
    /// Position reference lost; downstream must drop homed status.
    pub unhome: bool,
}

impl Default for SupervisorOutputs {
    fn default() -> Self {
        Self {
            recovery_in_progress: false,
            enable: false,
            power: true,
            machine_on: false,
            motor_enable: [true; AXIS_COUNT],
            unhome: false,
        }
    }
}
