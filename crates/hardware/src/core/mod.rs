//! Core processor implementation.
//!
//! This module contains the processor model: the architectural state, the
//! CPU container the stages operate on, and the configurable pipeline.

/// Architectural state (register file, data memory).
pub mod arch;

/// CPU container: program, architectural state and statistics.
pub mod cpu;

/// Instruction pipeline implementation (stages, latches, hazards, signals, engine).
pub mod pipeline;

pub use self::cpu::Cpu;
