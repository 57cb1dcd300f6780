//! Prelude module for common re-exports.
//!
//! ```rust
//! use estop_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::supervisor::config::{SupervisorConfig, TimingConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{AXIS_COUNT, JOURNAL_CAPACITY};

// ─── Signals ────────────────────────────────────────────────────────
pub use crate::supervisor::fault::FaultSource;
pub use crate::supervisor::signals::{Axis, SupervisorInputs, SupervisorOutputs};
