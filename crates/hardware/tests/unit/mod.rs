//! # Unit Components
//!
//! Suites for the simulator's components, driven through the public API.


/// Pipeline engine: timing, hazards, control transfers, faults.
pub mod core;

/// Register naming and operand resolution.
pub mod isa;

/// Loader, reference interpreter, exit report and engine equivalence.
pub mod sim;

/// Statistics counters after real runs.
pub mod stats_verification;
