//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure, the container for
//! everything the pipeline stages read and write besides their own latches:
//! 1. **Program:** The immutable instruction store.
//! 2. **State Management:** Register file and data memory.
//! 3. **Accounting:** Run statistics and per-instruction fetch counts.

use crate::core::arch::ArchState;
use crate::sim::program::Program;
use crate::stats::SimStats;

/// Main CPU structure containing all processor state.
///
/// The pipeline owns the latches and hazard bookkeeping; the CPU owns what
/// outlives any single instruction.
#[derive(Clone, Debug)]
pub struct Cpu {
    /// Instruction store.
    pub program: Program,
    /// Register file and data memory.
    pub state: ArchState,
    /// Performance statistics.
    pub stats: SimStats,
    /// Times each static instruction was fetched, indexed by instruction.
    pub fetch_counts: Vec<u64>,
}

impl Cpu {
    /// Creates a CPU for `program` with `$sp` at the data base and every other register zero.
    ///
    /// The first `4 * program.len()` bytes of memory are reserved for the
    /// instruction image.
    pub fn new(program: Program) -> Self {
        let len = program.len();
        Self {
            program,
            state: ArchState::new(len),
            stats: SimStats::default(),
            fetch_counts: vec![0; len],
        }
    }
}
