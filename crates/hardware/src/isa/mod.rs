//! Instruction Set Architecture (ISA) Definitions.
//!
//! The simulated machine runs a small MIPS-like subset:
//!
//! * ALU register form: `add`, `sub`, `mul`, `and`, `or`, `slt`.
//! * ALU immediate form: `addi`, `andi`, `ori`, `srl`, `sll`.
//! * Memory: `lw`, `sw`.
//! * Control: `beq`, `bne`, `j`.

/// Register name mappings.
pub mod abi;

/// Operand resolution from instruction records to typed instructions.
pub mod decode;

/// Typed instruction representation.
pub mod instruction;

pub use decode::{InstructionRecord, LabelTable};
pub use instruction::{AluOp, BranchCond, InstClass, Instruction, MemOperand};
