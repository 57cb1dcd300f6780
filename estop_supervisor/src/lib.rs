//! # E-Stop Supervisor Library
//!
//! Safety interlock for a five-axis machine tool. Once per control tick it
//! turns raw drive, spindle and E-Stop button signals into a single
//! machine-wide stop decision, and runs the timed recovery sequence that
//! power-cycles the drives before the stop is cleared.
//!
//! ## Tick Stages
//!
//! 1. **Aggregator**: instantaneous fault sources from raw inputs
//! 2. **Latches**: sticky per-source memory behind a startup/button guard
//! 3. **Sequencer**: Disabling → Waiting → Completing recovery phases
//! 4. **Outputs**: stop, enable, machine-on, motor enables, unhome
//! 5. **Timers**: four saturating cycle counters, advanced last
//!
//! ## Zero-Allocation Tick
//!
//! All state is held inline in [`supervisor::EstopSupervisor`]. The latch
//! journal is a fixed-capacity ring. `tick` performs no heap allocation.

#![deny(clippy::disallowed_types)]

pub mod aggregator;
pub mod config;
pub mod journal;
pub mod latch;
pub mod outputs;
pub mod scenario;
pub mod sequencer;
pub mod supervisor;
pub mod timers;
