//! Decoded instruction representation.
//!
//! Instructions are a closed set of kinds, each carrying only the fields it
//! uses. Register operands are already resolved to indices and branch targets
//! to instruction indices, so the pipeline never touches operand text.

use std::fmt;

use super::abi::register_name;

/// Arithmetic and logical operations performed by the ALU.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Wrapping multiplication (low 32 bits).
    Mul,
    /// Bitwise AND.
    And,
    /// Bitwise OR.
    Or,
    /// Set-less-than (signed): 1 if `a < b`, else 0.
    Slt,
    /// Logical right shift by `b` (0-31).
    Srl,
    /// Left shift by `b` (0-31).
    Sll,
}

impl AluOp {
    /// Applies the operation.
    pub const fn apply(self, a: i32, b: i32) -> i32 {
        match self {
            Self::Add => a.wrapping_add(b),
            Self::Sub => a.wrapping_sub(b),
            Self::Mul => a.wrapping_mul(b),
            Self::And => a & b,
            Self::Or => a | b,
            Self::Slt => (a < b) as i32,
            Self::Srl => ((a as u32) >> (b as u32 & 31)) as i32,
            Self::Sll => a.wrapping_shl(b as u32 & 31),
        }
    }

    /// Assembly mnemonic of the register form (`add`, `sub`, ...).
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mul => "mul",
            Self::And => "and",
            Self::Or => "or",
            Self::Slt => "slt",
            Self::Srl => "srl",
            Self::Sll => "sll",
        }
    }
}

/// Branch comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BranchCond {
    /// Taken when the operands are equal (`beq`).
    Eq,
    /// Taken when the operands differ (`bne`).
    Ne,
}

impl BranchCond {
    /// Evaluates the condition.
    pub const fn holds(self, a: i32, b: i32) -> bool {
        match self {
            Self::Eq => a == b,
            Self::Ne => a != b,
        }
    }
}

/// A `offset(base)` memory operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemOperand {
    /// Base register index.
    pub base: usize,
    /// Signed byte offset added to the base register.
    pub offset: i32,
}

/// Instruction class, used for statistics and hazard bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstClass {
    /// Register or immediate ALU operation.
    Alu,
    /// `lw`.
    Load,
    /// `sw`.
    Store,
    /// `beq`/`bne`.
    Branch,
    /// `j`.
    Jump,
}

/// A fully resolved instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `op rd, rs, rt`.
    AluReg {
        /// Operation.
        op: AluOp,
        /// Destination register.
        rd: usize,
        /// First source register.
        rs: usize,
        /// Second source register.
        rt: usize,
    },
    /// `op rd, rs, imm`.
    AluImm {
        /// Operation.
        op: AluOp,
        /// Destination register.
        rd: usize,
        /// Source register.
        rs: usize,
        /// Immediate operand.
        imm: i32,
    },
    /// `lw rt, offset(base)`.
    Load {
        /// Destination register.
        rt: usize,
        /// Address operand.
        addr: MemOperand,
    },
    /// `sw rt, offset(base)`.
    Store {
        /// Register holding the data to store.
        rt: usize,
        /// Address operand.
        addr: MemOperand,
    },
    /// `beq`/`bne rs, rt, label`.
    Branch {
        /// Comparison.
        cond: BranchCond,
        /// First compared register.
        rs: usize,
        /// Second compared register.
        rt: usize,
        /// Instruction index of the label.
        target: usize,
    },
    /// `j label`.
    Jump {
        /// Instruction index of the label.
        target: usize,
    },
}

impl Instruction {
    /// Instruction class.
    pub const fn class(&self) -> InstClass {
        match self {
            Self::AluReg { .. } | Self::AluImm { .. } => InstClass::Alu,
            Self::Load { .. } => InstClass::Load,
            Self::Store { .. } => InstClass::Store,
            Self::Branch { .. } => InstClass::Branch,
            Self::Jump { .. } => InstClass::Jump,
        }
    }

    /// Register written by this instruction, if any.
    pub const fn dest(&self) -> Option<usize> {
        match self {
            Self::AluReg { rd, .. } | Self::AluImm { rd, .. } => Some(*rd),
            Self::Load { rt, .. } => Some(*rt),
            Self::Store { .. } | Self::Branch { .. } | Self::Jump { .. } => None,
        }
    }

    /// Whether the instruction redirects control flow.
    pub const fn is_control(&self) -> bool {
        matches!(self, Self::Branch { .. } | Self::Jump { .. })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = register_name;
        match *self {
            Self::AluReg { op, rd, rs, rt } => {
                write!(f, "{} {}, {}, {}", op.mnemonic(), r(rd), r(rs), r(rt))
            }
            Self::AluImm { op, rd, rs, imm } => {
                let mnemonic = match op {
                    AluOp::Add => "addi",
                    AluOp::And => "andi",
                    AluOp::Or => "ori",
                    other => other.mnemonic(),
                };
                write!(f, "{mnemonic} {}, {}, {imm}", r(rd), r(rs))
            }
            Self::Load { rt, addr } => write!(f, "lw {}, {}({})", r(rt), addr.offset, r(addr.base)),
            Self::Store { rt, addr } => write!(f, "sw {}, {}({})", r(rt), addr.offset, r(addr.base)),
            Self::Branch {
                cond,
                rs,
                rt,
                target,
            } => {
                let mnemonic = match cond {
                    BranchCond::Eq => "beq",
                    BranchCond::Ne => "bne",
                };
                write!(f, "{mnemonic} {}, {}, @{target}", r(rs), r(rt))
            }
            Self::Jump { target } => write!(f, "j @{target}"),
        }
    }
}
