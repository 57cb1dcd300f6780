//! E-Stop Common Library
//!
//! Shared constants, signal types and configuration loading for the
//! E-Stop supervisor workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Axis count and default cycle-count thresholds
//! - [`config`] - Configuration loading traits and types
//! - [`supervisor`] - Supervisor signal registers, fault sources and timing config
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use estop_common::prelude::*;
//!
//! let timing = TimingConfig::default();
//! assert!(timing.validate().is_ok());
//! assert_eq!(Axis::ALL.len(), AXIS_COUNT);
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
pub mod supervisor;
