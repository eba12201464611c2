//! Sequential reference interpreter.
//!
//! Executes a [`Program`] one instruction per cycle with no overlap, using the
//! same architectural state and the same ALU and address checks as the
//! pipeline. Any program that terminates must leave the same registers and
//! memory here as in every pipeline configuration.

use tracing::trace;

use crate::common::Fault;
use crate::core::arch::{ArchState, DataMemory, RegisterFile};
use crate::core::pipeline::StepStatus;
use crate::isa::Instruction;
use crate::sim::program::Program;

/// Unpipelined interpreter.
#[derive(Clone, Debug)]
pub struct Interpreter {
    program: Program,
    state: ArchState,
    pc: usize,
    cycles: u64,
    executed: Vec<u64>,
}

impl Interpreter {
    /// Creates an interpreter positioned at instruction 0.
    pub fn new(program: Program) -> Self {
        let len = program.len();
        Self {
            program,
            state: ArchState::new(len),
            pc: 0,
            cycles: 0,
            executed: vec![0; len],
        }
    }

    /// Executes one instruction.
    ///
    /// # Errors
    ///
    /// The program error raised by the instruction. Nothing is modified in that case.
    pub fn step(&mut self) -> Result<StepStatus, Fault> {
        let pc = self.pc;
        let Some(decoded) = self.program.get(pc) else {
            return Ok(StepStatus::Drained);
        };
        let cycle = self.cycles + 1;
        let fault = |error| Fault { error, pc, cycle };
        let inst = decoded.clone().map_err(fault)?;

        let regs = &mut self.state.regs;
        let mut next = pc + 1;
        match inst {
            Instruction::AluReg { op, rd, rs, rt } => {
                regs.write(rd, op.apply(regs.read(rs), regs.read(rt)));
            }
            Instruction::AluImm { op, rd, rs, imm } => {
                regs.write(rd, op.apply(regs.read(rs), imm));
            }
            Instruction::Load { rt, addr } => {
                let at = i64::from(regs.read(addr.base)) + i64::from(addr.offset);
                let value = self.state.memory.load(at).map_err(fault)?;
                regs.write(rt, value);
            }
            Instruction::Store { rt, addr } => {
                let at = i64::from(regs.read(addr.base)) + i64::from(addr.offset);
                self.state.memory.store(at, regs.read(rt)).map_err(fault)?;
            }
            Instruction::Branch {
                cond,
                rs,
                rt,
                target,
            } => {
                if cond.holds(regs.read(rs), regs.read(rt)) {
                    next = target;
                }
            }
            Instruction::Jump { target } => next = target,
        }

        self.cycles = cycle;
        self.executed[pc] += 1;
        self.pc = next;
        trace!(cycle, pc, next_pc = next, "executed");
        Ok(if self.pc >= self.program.len() {
            StepStatus::Drained
        } else {
            StepStatus::Running
        })
    }

    /// Runs to completion and returns the number of instructions executed.
    ///
    /// # Errors
    ///
    /// The first program error raised.
    pub fn run(&mut self) -> Result<u64, Fault> {
        while self.step()? == StepStatus::Running {}
        Ok(self.cycles)
    }

    /// Runs at most `max_steps` instructions. Returns `true` if the program finished.
    ///
    /// # Errors
    ///
    /// The first program error raised.
    pub fn run_for(&mut self, max_steps: u64) -> Result<bool, Fault> {
        for _ in 0..max_steps {
            if self.step()? == StepStatus::Drained {
                return Ok(true);
            }
        }
        Ok(self.pc >= self.program.len())
    }

    /// Register file.
    pub const fn registers(&self) -> &RegisterFile {
        &self.state.regs
    }

    /// Data memory.
    pub const fn memory(&self) -> &DataMemory {
        &self.state.memory
    }

    /// Index of the next instruction.
    pub const fn pc(&self) -> usize {
        self.pc
    }

    /// Instructions executed so far (one per cycle).
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Times each static instruction was executed.
    pub fn executed_counts(&self) -> &[u64] {
        &self.executed
    }

    /// Program being run.
    pub const fn program(&self) -> &Program {
        &self.program
    }
}
