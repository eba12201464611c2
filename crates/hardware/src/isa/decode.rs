//! Operand resolution.
//!
//! Turns an [`InstructionRecord`] (mnemonic plus operand strings, as produced
//! by the assembly loader) into a typed [`Instruction`]. Register names go
//! through the ABI table, immediates are parsed as decimal `i32`, memory
//! operands accept `offset(reg)`, `(reg)` or a bare address, and branch
//! targets are looked up in the [`LabelTable`].

use std::collections::HashMap;

use super::abi::{REG_ZERO, register_index};
use super::instruction::{AluOp, BranchCond, Instruction, MemOperand};
use crate::common::ProgramError;

/// One instruction as written in the source, before operand resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionRecord {
    /// Mnemonic (`add`, `lw`, `beq`, ...).
    pub mnemonic: String,
    /// Operand strings, in source order.
    pub operands: Vec<String>,
    /// 1-based source line number, 0 when built programmatically.
    pub line: usize,
}

impl InstructionRecord {
    /// Builds a record from a mnemonic and operand list.
    pub fn new(mnemonic: &str, operands: &[&str]) -> Self {
        Self {
            mnemonic: mnemonic.to_string(),
            operands: operands.iter().map(ToString::to_string).collect(),
            line: 0,
        }
    }

    /// The instruction as a single line of assembly.
    pub fn text(&self) -> String {
        if self.operands.is_empty() {
            self.mnemonic.clone()
        } else {
            format!("{} {}", self.mnemonic, self.operands.join(", "))
        }
    }
}

/// Label definition state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LabelSlot {
    At(usize),
    Duplicate,
}

/// Maps label names to instruction indices.
///
/// A label defined twice is remembered as invalid; any use of it fails with
/// `InvalidLabel`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelTable {
    slots: HashMap<String, LabelSlot>,
}

impl LabelTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines `name` at instruction index `index`.
    pub fn define(&mut self, name: &str, index: usize) {
        let _ = self
            .slots
            .entry(name.to_string())
            .and_modify(|slot| *slot = LabelSlot::Duplicate)
            .or_insert(LabelSlot::At(index));
    }

    /// Looks up a branch or jump target.
    pub fn resolve(&self, name: &str) -> Result<usize, ProgramError> {
        if !is_label_name(name) {
            return Err(ProgramError::SyntaxError(format!("malformed label `{name}`")));
        }
        match self.slots.get(name) {
            Some(LabelSlot::At(index)) => Ok(*index),
            Some(LabelSlot::Duplicate) | None => Err(ProgramError::InvalidLabel(name.to_string())),
        }
    }

    /// Number of distinct label names seen.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no labels were defined.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A label starts with a letter and continues with letters or digits.
pub fn is_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic()) && chars.all(|c| c.is_ascii_alphanumeric())
}

fn register(operand: &str) -> Result<usize, ProgramError> {
    register_index(operand).ok_or_else(|| ProgramError::InvalidRegister(operand.to_string()))
}

fn immediate(operand: &str) -> Result<i32, ProgramError> {
    operand
        .parse()
        .map_err(|_| ProgramError::SyntaxError(format!("bad immediate `{operand}`")))
}

fn shift_amount(operand: &str) -> Result<i32, ProgramError> {
    let amount = immediate(operand)?;
    if (0..32).contains(&amount) {
        Ok(amount)
    } else {
        Err(ProgramError::SyntaxError(format!("shift amount `{operand}` out of range")))
    }
}

/// Parses `offset(reg)`, `(reg)` or a bare byte address.
pub fn memory_operand(operand: &str) -> Result<MemOperand, ProgramError> {
    if let Some(inner) = operand.strip_suffix(')') {
        let Some((offset, base)) = inner.split_once('(') else {
            return Err(ProgramError::SyntaxError(format!("bad memory operand `{operand}`")));
        };
        let offset = if offset.is_empty() { 0 } else { immediate(offset)? };
        return Ok(MemOperand {
            base: register(base)?,
            offset,
        });
    }
    Ok(MemOperand {
        base: REG_ZERO,
        offset: immediate(operand)?,
    })
}

fn operands<'a, const N: usize>(record: &'a InstructionRecord) -> Result<[&'a str; N], ProgramError> {
    let ops: Vec<&str> = record.operands.iter().map(String::as_str).collect();
    ops.try_into().map_err(|ops: Vec<&str>| {
        ProgramError::SyntaxError(format!(
            "`{}` takes {N} operands, found {}",
            record.mnemonic,
            ops.len()
        ))
    })
}

/// Resolves a record into an instruction.
pub fn resolve(record: &InstructionRecord, labels: &LabelTable) -> Result<Instruction, ProgramError> {
    let alu_reg = |op| -> Result<Instruction, ProgramError> {
        let [rd, rs, rt] = operands::<3>(record)?;
        Ok(Instruction::AluReg {
            op,
            rd: register(rd)?,
            rs: register(rs)?,
            rt: register(rt)?,
        })
    };
    let alu_imm = |op, shift: bool| -> Result<Instruction, ProgramError> {
        let [rd, rs, imm] = operands::<3>(record)?;
        Ok(Instruction::AluImm {
            op,
            rd: register(rd)?,
            rs: register(rs)?,
            imm: if shift { shift_amount(imm)? } else { immediate(imm)? },
        })
    };
    let branch = |cond| -> Result<Instruction, ProgramError> {
        let [rs, rt, label] = operands::<3>(record)?;
        Ok(Instruction::Branch {
            cond,
            rs: register(rs)?,
            rt: register(rt)?,
            target: labels.resolve(label)?,
        })
    };

    match record.mnemonic.as_str() {
        "add" => alu_reg(AluOp::Add),
        "sub" => alu_reg(AluOp::Sub),
        "mul" => alu_reg(AluOp::Mul),
        "and" => alu_reg(AluOp::And),
        "or" => alu_reg(AluOp::Or),
        "slt" => alu_reg(AluOp::Slt),
        "addi" => alu_imm(AluOp::Add, false),
        "andi" => alu_imm(AluOp::And, false),
        "ori" => alu_imm(AluOp::Or, false),
        "srl" => alu_imm(AluOp::Srl, true),
        "sll" => alu_imm(AluOp::Sll, true),
        "lw" | "sw" => {
            let [rt, addr] = operands::<2>(record)?;
            let rt = register(rt)?;
            let addr = memory_operand(addr)?;
            Ok(if record.mnemonic == "lw" {
                Instruction::Load { rt, addr }
            } else {
                Instruction::Store { rt, addr }
            })
        }
        "beq" => branch(BranchCond::Eq),
        "bne" => branch(BranchCond::Ne),
        "j" => {
            let [label] = operands::<1>(record)?;
            Ok(Instruction::Jump {
                target: labels.resolve(label)?,
            })
        }
        other => Err(ProgramError::SyntaxError(format!("unknown instruction `{other}`"))),
    }
}
