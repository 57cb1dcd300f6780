//! Fault source bitflags.
//!
//! One bit per distinct E-Stop source. The same type describes the
//! instantaneous fault set of a tick, the latched set, and the set of
//! sources that latched during a tick.

use bitflags::bitflags;

use super::signals::Axis;

bitflags! {
    /// Distinct E-Stop fault sources.
    ///
    /// COMMUNICATION flags are masked when `ignore_com_errors` is set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FaultSource: u16 {
        /// X drive fault. **COMMUNICATION**.
        const DRIVE_X           = 0x0001;
        /// Y drive fault. **COMMUNICATION**.
        const DRIVE_Y           = 0x0002;
        /// Z drive fault. **COMMUNICATION**.
        const DRIVE_Z           = 0x0004;
        /// B drive fault. **COMMUNICATION**.
        const DRIVE_B           = 0x0008;
        /// C drive fault. **COMMUNICATION**.
        const DRIVE_C           = 0x0010;
        /// X following error.
        const FOLLOWING_X       = 0x0020;
        /// Y following error.
        const FOLLOWING_Y       = 0x0040;
        /// Z following error.
        const FOLLOWING_Z       = 0x0080;
        /// B following error.
        const FOLLOWING_B       = 0x0100;
        /// C following error.
        const FOLLOWING_C       = 0x0200;
        /// Spindle VFD reported a non-zero error code. **COMMUNICATION**.
        const SPINDLE_ERROR     = 0x0400;
        /// Modbus link to the spindle VFD lost. **COMMUNICATION**.
        const SPINDLE_COMM      = 0x0800;
        /// Physical E-Stop button pressed.
        const STOP_BUTTON       = 0x1000;
    }
}

impl FaultSource {
    /// All drive fault bits.
    pub const DRIVE_MASK: Self = Self::from_bits_truncate(0x001F);

    /// All following-error bits.
    pub const FOLLOWING_MASK: Self = Self::from_bits_truncate(0x03E0);

    /// Sources suppressed by `ignore_com_errors`.
    pub const COMMUNICATION_MASK: Self = Self::from_bits_truncate(
        Self::DRIVE_MASK.bits() | Self::SPINDLE_ERROR.bits() | Self::SPINDLE_COMM.bits(),
    );

    /// Sources whose latch is held off during the startup/button grace window.
    pub const GUARDED_MASK: Self = Self::COMMUNICATION_MASK;

    /// Drive fault bit for `axis`.
    #[inline]
    pub const fn drive(axis: Axis) -> Self {
        Self::from_bits_truncate(Self::DRIVE_X.bits() << axis.index())
    }

    /// Following-error bit for `axis`.
    #[inline]
    pub const fn following(axis: Axis) -> Self {
        Self::from_bits_truncate(Self::FOLLOWING_X.bits() << axis.index())
    }

    /// Axis associated with a single drive or following-error bit.
    pub fn axis(&self) -> Option<Axis> {
        Axis::ALL
            .into_iter()
            .find(|&axis| *self == Self::drive(axis) || *self == Self::following(axis))
    }

    /// Operator-facing description of a single source bit.
    pub fn describe(&self) -> &'static str {
        DESCRIPTIONS
            .iter()
            .find(|(source, _)| source == self)
            .map_or("multiple sources", |&(_, text)| text)
    }
}

const DESCRIPTIONS: [(FaultSource, &str); 13] = [
    (FaultSource::DRIVE_X, "Motor X fault"),
    (FaultSource::DRIVE_Y, "Motor Y fault"),
    (FaultSource::DRIVE_Z, "Motor Z fault"),
    (FaultSource::DRIVE_B, "Motor B fault"),
    (FaultSource::DRIVE_C, "Motor C fault"),
    (FaultSource::FOLLOWING_X, "X following error"),
    (FaultSource::FOLLOWING_Y, "Y following error"),
    (FaultSource::FOLLOWING_Z, "Z following error"),
    (FaultSource::FOLLOWING_B, "B following error"),
    (FaultSource::FOLLOWING_C, "C following error"),
    (FaultSource::SPINDLE_ERROR, "Spindle error"),
    (FaultSource::SPINDLE_COMM, "Spindle communication error"),
    (FaultSource::STOP_BUTTON, "E-Stop button pressed"),
];

impl Default for FaultSource {
    fn default() -> Self {
        Self::empty()
    }
}
