//! Global System Constants.
//!
//! Sizes shared by the architectural state, the loader and the engine.

/// Size of a data word and of one instruction slot, in bytes.
pub const WORD_BYTES: usize = 4;

/// Size of the unified instruction/data address space in bytes (1 MiB).
///
/// The first `WORD_BYTES * instruction_count` bytes are reserved for the
/// program; data accesses must fall above that region and below this ceiling.
pub const MEMORY_BYTES: usize = 1 << 20;

/// Number of data words in memory.
pub const MEMORY_WORDS: usize = MEMORY_BYTES / WORD_BYTES;

/// Number of general-purpose registers.
pub const NUM_REGS: usize = 32;
