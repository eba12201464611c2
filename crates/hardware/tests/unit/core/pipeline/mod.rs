//! Pipeline engine tests.

/// Fill and drain timing.
pub mod drain;

/// Precise faults.
pub mod faults;


/// Latch contents observed cycle by cycle.
pub mod latches;
