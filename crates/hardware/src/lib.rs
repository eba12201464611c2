//! Cycle-level pipelined processor simulator library.
//!
//! This crate simulates a MIPS-like load/store processor one clock cycle at a time:
//! 1. **Core:** A configurable in-order pipeline (classic 5-stage or split 9-stage)
//!    with hazard detection, optional forwarding and branch resolution in Decode.
//! 2. **ISA:** Register names, typed instructions and operand resolution.
//! 3. **Simulation:** Assembly loader, simulator facade, sequential reference
//!    interpreter and exit report.
//! 4. **Configuration:** JSON-deserializable run and pipeline settings.
//! 5. **Statistics:** Cycle, stall, bubble and instruction-mix counters.

/// Common types and constants (error classes, memory geometry).
pub mod common;
/// Simulator configuration (defaults, layouts, run options).
pub mod config;
/// CPU core (architectural state, pipeline).
pub mod core;
/// Instruction set (registers, instructions, operand resolution).
pub mod isa;
/// Program loading, simulation driver, reference interpreter and report.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Main CPU type; holds program, architectural state and stats.
pub use crate::core::Cpu;
/// Immutable instruction store; build with `sim::loader::parse`.
pub use crate::sim::Program;
/// Top-level simulator; owns a `Cpu` and a pipeline.
pub use crate::sim::Simulator;
