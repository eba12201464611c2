//! General-Purpose Register File.
//!
//! This module implements the integer register file. It performs the following:
//! 1. **Storage:** Maintains 32 signed 32-bit registers (`$0`-`$31`).
//! 2. **Invariant Enforcement:** Register `$0` reads as zero and discards writes.
//! 3. **Debugging:** Renders the complete register state for per-cycle dumps.

use std::fmt;

use crate::common::NUM_REGS;

/// General-purpose register file.
///
/// Register `$0` is hardwired to zero and cannot be modified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [i32; NUM_REGS],
}

impl RegisterFile {
    /// Creates a register file with every register set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Register `$0` always returns 0.
    pub fn read(&self, idx: usize) -> i32 {
        if idx == 0 { 0 } else { self.regs[idx] }
    }

    /// Writes a register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Writes to `$0` are ignored.
    /// * `val` - The value to write.
    pub fn write(&mut self, idx: usize, val: i32) {
        if idx != 0 {
            self.regs[idx] = val;
        }
    }

    /// Copy of all 32 register values, `$0` first.
    pub const fn snapshot(&self) -> [i32; NUM_REGS] {
        self.regs
    }
}

impl fmt::Display for RegisterFile {
    /// Space-separated register values in index order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, val) in self.regs.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{val}")?;
        }
        Ok(())
    }
}
