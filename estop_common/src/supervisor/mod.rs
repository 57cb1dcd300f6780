//! E-Stop supervisor shared types.
//!
//! Signal registers exchanged with the wiring layer, fault-source bitflags,
//! and the timing configuration.

pub mod config;
pub mod fault;
pub mod signals;
