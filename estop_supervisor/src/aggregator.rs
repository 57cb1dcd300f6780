//! Instantaneous fault aggregation.
//!
//! Pure function of the current tick's raw inputs. No grace window applies
//! here: a live raw fault always forces a stop on the tick it is seen.

use estop_common::supervisor::fault::FaultSource;
use estop_common::supervisor::signals::{Axis, SupervisorInputs};

/// Fault state computed fresh from one tick of raw inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstantFaults {
    /// Active sources after communication-error masking.
    pub sources: FaultSource,
    /// Spindle error code if `SPINDLE_ERROR` is active, else 0.
    pub spindle_error_code: i32,
}

impl InstantFaults {
    /// Any source active this tick.
    #[inline]
    pub const fn is_faulted(&self) -> bool {
        !self.sources.is_empty()
    }

    #[inline]
    pub const fn button_pressed(&self) -> bool {
        self.sources.contains(FaultSource::STOP_BUTTON)
    }
}

/// Collect the active fault sources for this tick.
///
/// Drive faults, the spindle code and the spindle link are dropped when
/// `ignore_com_errors` is set. Following errors and the button never are.
pub fn aggregate(inputs: &SupervisorInputs) -> InstantFaults {
    let mut sources = FaultSource::empty();

    for axis in Axis::ALL {
        if inputs.drive_fault[axis.index()] {
            sources |= FaultSource::drive(axis);
        }
        if inputs.following_error[axis.index()] {
            sources |= FaultSource::following(axis);
        }
    }

    if inputs.spindle_error_code != 0 {
        sources |= FaultSource::SPINDLE_ERROR;
    }
    if !inputs.spindle_modbus_ok {
        sources |= FaultSource::SPINDLE_COMM;
    }
    if inputs.button_pressed {
        sources |= FaultSource::STOP_BUTTON;
    }

    if inputs.ignore_com_errors {
        sources.remove(FaultSource::COMMUNICATION_MASK);
    }

    let spindle_error_code = if sources.contains(FaultSource::SPINDLE_ERROR) {
        inputs.spindle_error_code
    } else {
        0
    };

    InstantFaults {
        sources,
        spindle_error_code,
    }
}
