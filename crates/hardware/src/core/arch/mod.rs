//! Architectural state.
//!
//! This module holds the only externally observable state of a run:
//! 1. **GPRs:** The 32-entry integer register file, written only by write-back.
//! 2. **Memory:** The word-addressed data memory, touched only by the memory stage.

/// General-Purpose Register file implementation.
pub mod gpr;

/// Word-addressed data memory.
pub mod memory;

pub use gpr::RegisterFile;
pub use memory::DataMemory;

use crate::common::WORD_BYTES;
use crate::isa::abi::REG_SP;

/// Register file plus data memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchState {
    /// Integer register file.
    pub regs: RegisterFile,
    /// Data memory.
    pub memory: DataMemory,
}

impl ArchState {
    /// Fresh state for a program of `instruction_count` instructions.
    ///
    /// Every register is zero except `$sp`, which points at the first data
    /// word past the instruction image.
    pub fn new(instruction_count: usize) -> Self {
        let data_base = instruction_count * WORD_BYTES;
        let mut regs = RegisterFile::new();
        regs.write(REG_SP, data_base as i32);
        Self {
            regs,
            memory: DataMemory::new(data_base),
        }
    }
}
