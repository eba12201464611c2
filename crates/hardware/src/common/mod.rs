//! Common types used throughout the pipeline simulator.
//!
//! This module provides the building blocks shared by every component:
//! 1. **Constants:** Word size, memory ceiling and register count.
//! 2. **Error Handling:** Program error classes, fault locations and engine errors.

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types and fault definitions.
pub mod error;

pub use constants::{MEMORY_BYTES, MEMORY_WORDS, NUM_REGS, WORD_BYTES};
pub use error::{Fault, ProgramError, SimError};
