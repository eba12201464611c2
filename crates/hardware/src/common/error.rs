//! Program faults and engine errors.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Program Errors:** The five fatal classes a simulated program can raise
//!    (bad register, bad label, bad address, syntax, program too large).
//! 2. **Fault Location:** `Fault` pins a program error to the static instruction
//!    and the cycle in which it was raised.
//! 3. **Engine Errors:** `SimError` wraps program faults together with the
//!    scheduling defects the engine itself can detect.

use thiserror::Error;

/// Fatal error raised by the simulated program.
///
/// Every variant aborts the run. The engine never retries; whatever architectural
/// state had been committed before the fault stays observable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// An operand does not name one of the 32 registers.
    ///
    /// The associated value is the offending operand text.
    #[error("invalid register `{0}`")]
    InvalidRegister(String),

    /// A branch or jump target is undefined or was defined more than once.
    ///
    /// The associated value is the label name.
    #[error("invalid label `{0}`")]
    InvalidLabel(String),

    /// A computed data address is misaligned, inside the instruction region,
    /// or beyond the memory ceiling.
    ///
    /// The associated value is the byte address that was computed.
    #[error("invalid address {0}")]
    InvalidAddress(i64),

    /// An operand or mnemonic could not be parsed.
    #[error("syntax error: {0}")]
    SyntaxError(String),

    /// The program does not fit below the data segment.
    #[error("program of {instructions} instructions exceeds the limit of {limit}")]
    MemoryLimitExceeded {
        /// Number of instructions in the program.
        instructions: usize,
        /// Largest accepted instruction count plus one.
        limit: usize,
    },
}

impl ProgramError {
    /// Process exit status associated with this error class.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidRegister(_) => 1,
            Self::InvalidLabel(_) => 2,
            Self::InvalidAddress(_) => 3,
            Self::SyntaxError(_) => 4,
            Self::MemoryLimitExceeded { .. } => 5,
        }
    }

    /// One-line description of the error class, as printed in the exit report.
    pub const fn class_message(&self) -> &'static str {
        match self {
            Self::InvalidRegister(_) => {
                "Invalid register provided or syntax error in providing register"
            }
            Self::InvalidLabel(_) => "Label used not defined or defined too many times",
            Self::InvalidAddress(_) => "Unaligned or invalid memory address specified",
            Self::SyntaxError(_) => "Syntax error encountered",
            Self::MemoryLimitExceeded { .. } => "Memory limit exceeded",
        }
    }
}

/// A program error together with where and when it was raised.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{error} at instruction {pc} (cycle {cycle})")]
pub struct Fault {
    /// The error class and its detail.
    pub error: ProgramError,
    /// Static index of the faulting instruction.
    pub pc: usize,
    /// 1-based cycle in which the fault was raised; 0 before the first cycle.
    pub cycle: u64,
}

/// Errors returned by the simulation driver.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    /// The simulated program faulted.
    #[error(transparent)]
    Program(#[from] Fault),

    /// Two instructions reached write-back with a destination in the same cycle.
    ///
    /// Decode reserves write-back slots ahead of time, so this indicates an
    /// engine defect rather than a program error.
    #[error("write-back port conflict in cycle {cycle} between instructions {pcs:?}")]
    PortConflict {
        /// Cycle in which both candidates arrived.
        cycle: u64,
        /// Static indices of the competing instructions.
        pcs: Vec<usize>,
    },

    /// A forwarded operand had not arrived by the stage that consumes it.
    #[error("operand ${reg} of instruction {pc} unavailable in cycle {cycle}")]
    OperandUnavailable {
        /// Static index of the consuming instruction.
        pc: usize,
        /// Register the operand was forwarded from.
        reg: usize,
        /// Cycle in which the value was required.
        cycle: u64,
    },

    /// The program counter can only be seeded before the first cycle.
    #[error("the simulation has already started")]
    AlreadyStarted,
}

impl SimError {
    /// Exit status for the command-line front end.
    ///
    /// Program faults map to their class code; engine defects use 70 (`EX_SOFTWARE`).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Program(fault) => fault.error.exit_code(),
            Self::PortConflict { .. } | Self::OperandUnavailable { .. } | Self::AlreadyStarted => {
                70
            }
        }
    }

    /// The program fault, when this error is one.
    pub const fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Program(fault) => Some(fault),
            _ => None,
        }
    }
}
