//! Simulation driver and program handling.
//!
//! Provides the instruction store, the assembly loader, the pipelined
//! simulator facade, the sequential reference interpreter and the exit report.

/// Assembly text to program.
pub mod loader;

/// Immutable instruction store.
pub mod program;

/// Sequential reference interpreter.
pub mod reference;

/// Exit report rendering.
pub mod report;

/// Pipelined simulator facade.
pub mod simulator;

pub use program::Program;
pub use simulator::{CycleObserver, Exit, RunSummary, Simulator};
