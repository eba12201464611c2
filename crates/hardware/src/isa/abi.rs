//! MIPS register naming.
//!
//! Registers are written `$n` (`$0`-`$31`) or by their conventional ABI name
//! (`$zero`, `$t0`, `$sp`, ...). Both forms map 1:1 onto the 32 register indices.

use crate::common::NUM_REGS;

/// Register `$0` (`$zero`, always zero).
pub const REG_ZERO: usize = 0;
/// Register `$1` (`$at`, assembler temporary).
pub const REG_AT: usize = 1;
/// Register `$2` (`$v0`, first result).
pub const REG_V0: usize = 2;
/// Register `$4` (`$a0`, first argument).
pub const REG_A0: usize = 4;
/// Register `$8` (`$t0`, first temporary).
pub const REG_T0: usize = 8;
/// Register `$9` (`$t1`).
pub const REG_T1: usize = 9;
/// Register `$10` (`$t2`).
pub const REG_T2: usize = 10;
/// Register `$16` (`$s0`, first saved register).
pub const REG_S0: usize = 16;
/// Register `$24` (`$t8`).
pub const REG_T8: usize = 24;
/// Register `$28` (`$gp`, global pointer).
pub const REG_GP: usize = 28;
/// Register `$29` (`$sp`, stack pointer).
pub const REG_SP: usize = 29;
/// Register `$31` (`$ra`, return address).
pub const REG_RA: usize = 31;

/// ABI names indexed by register number.
pub const ABI_NAMES: [&str; NUM_REGS] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp", "s8",
    "ra",
];

/// Resolves a register operand such as `$t0` or `$8` to its index.
///
/// Numeric names must be written without leading zeros, exactly as `$0`..`$31`.
pub fn register_index(name: &str) -> Option<usize> {
    let body = name.strip_prefix('$')?;
    if let Some(idx) = ABI_NAMES.iter().position(|abi| *abi == body) {
        return Some(idx);
    }
    let idx: usize = body.parse().ok()?;
    (idx < NUM_REGS && idx.to_string() == body).then_some(idx)
}

/// Canonical `$name` spelling of a register, used in traces.
pub fn register_name(idx: usize) -> String {
    ABI_NAMES
        .get(idx)
        .map_or_else(|| format!("${idx}"), |abi| format!("${abi}"))
}
