//! Word-addressed data memory.
//!
//! Memory is one flat 1 MiB byte space shared with the program image. The
//! program occupies the first `4 * instruction_count` bytes, which are
//! reserved: loads and stores must be word aligned, above the reserved region
//! and below the ceiling. Violations surface as `ProgramError::InvalidAddress`
//! and leave memory untouched.

use crate::common::{MEMORY_BYTES, MEMORY_WORDS, ProgramError, WORD_BYTES};

/// Linear data memory of signed 32-bit words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataMemory {
    words: Vec<i32>,
    reserved_bytes: usize,
}

impl DataMemory {
    /// Creates zeroed memory with the first `reserved_bytes` bytes set aside for instructions.
    pub fn new(reserved_bytes: usize) -> Self {
        Self {
            words: vec![0; MEMORY_WORDS],
            reserved_bytes,
        }
    }

    /// Size in bytes of the reserved instruction region.
    pub const fn reserved_bytes(&self) -> usize {
        self.reserved_bytes
    }

    /// Validates a byte address and converts it to a word index.
    pub fn word_index(&self, addr: i64) -> Result<usize, ProgramError> {
        let word = WORD_BYTES as i64;
        if addr % word != 0 || addr < self.reserved_bytes as i64 || addr >= MEMORY_BYTES as i64 {
            return Err(ProgramError::InvalidAddress(addr));
        }
        Ok((addr / word) as usize)
    }

    /// Reads the word at `addr`.
    pub fn load(&self, addr: i64) -> Result<i32, ProgramError> {
        let idx = self.word_index(addr)?;
        Ok(self.words[idx])
    }

    /// Writes `value` to the word at `addr`.
    pub fn store(&mut self, addr: i64, value: i32) -> Result<(), ProgramError> {
        let idx = self.word_index(addr)?;
        self.words[idx] = value;
        Ok(())
    }

    /// Iterates over `(byte_address, value)` for every non-zero word, lowest address first.
    pub fn nonzero_words(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(|(i, v)| (i * WORD_BYTES, *v))
    }
}
