//! # Operand Resolution Tests
//!
//! Assembly text goes through the loader and operand resolution. Errors are
//! kept per instruction; only a run that reaches the instruction raises them.

use pipesim_core::common::ProgramError;
use pipesim_core::isa::abi::{self, REG_RA, REG_SP, REG_T0, REG_ZERO};
use pipesim_core::isa::{AluOp, BranchCond, Instruction, MemOperand};
use pipesim_core::sim::loader::parse;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

fn first(source: &str) -> Result<Instruction, ProgramError> {
    parse(source).unwrap().get(0).unwrap().clone()
}

#[rstest]
#[case("add $t0, $t1, $t2", Instruction::AluReg { op: AluOp::Add, rd: 8, rs: 9, rt: 10 })]
#[case("slt $8,$9,$10", Instruction::AluReg { op: AluOp::Slt, rd: 8, rs: 9, rt: 10 })]
#[case("addi $sp, $sp, -4", Instruction::AluImm { op: AluOp::Add, rd: REG_SP, rs: REG_SP, imm: -4 })]
#[case("srl $t0, $t0, 31", Instruction::AluImm { op: AluOp::Srl, rd: REG_T0, rs: REG_T0, imm: 31 })]
#[case("lw $ra, 8($sp)", Instruction::Load { rt: REG_RA, addr: MemOperand { base: REG_SP, offset: 8 } })]
#[case("sw $zero, ($t0)", Instruction::Store { rt: REG_ZERO, addr: MemOperand { base: REG_T0, offset: 0 } })]
#[case("lw $t0, 400", Instruction::Load { rt: REG_T0, addr: MemOperand { base: REG_ZERO, offset: 400 } })]
fn resolves(#[case] source: &str, #[case] expected: Instruction) {
    assert_eq!(first(source), Ok(expected));
}

#[rstest]
#[case("add $t0, $t1, $t99", ProgramError::InvalidRegister("$t99".into()))]
#[case("lw $t0, 4($x)", ProgramError::InvalidRegister("$x".into()))]
#[case("beq $t0, $t1, missing", ProgramError::InvalidLabel("missing".into()))]
fn error_classes(#[case] source: &str, #[case] expected: ProgramError) {
    assert_eq!(first(source), Err(expected));
}

#[rstest]
#[case::unknown_mnemonic("nop")]
#[case::missing_operand("add $t0, $t1")]
#[case::extra_operand("j a b")]
#[case::bad_immediate("addi $t0, $t0, 0x10")]
#[case::shift_range("sll $t0, $t0, 32")]
#[case::malformed_label("j 1abc")]
fn syntax_errors(#[case] source: &str) {
    assert!(
        matches!(first(source), Err(ProgramError::SyntaxError(_))),
        "{source}"
    );
}

#[test]
fn branch_targets_resolve_to_indices() {
    let program = parse("top: beq $t0, $zero, end\nbne $t0, $zero, top\nend:\n").unwrap();
    assert_eq!(
        program.get(0),
        Some(&Ok(Instruction::Branch {
            cond: BranchCond::Eq,
            rs: REG_T0,
            rt: REG_ZERO,
            target: 2
        }))
    );
    assert_eq!(
        program.get(1),
        Some(&Ok(Instruction::Branch {
            cond: BranchCond::Ne,
            rs: REG_T0,
            rt: REG_ZERO,
            target: 0
        }))
    );
}

#[test]
fn duplicate_label_invalidates_every_use() {
    let program = parse("x: j x\nx: j x\n").unwrap();
    for idx in 0..2 {
        assert_eq!(
            program.get(idx),
            Some(&Err(ProgramError::InvalidLabel("x".into())))
        );
    }
}

#[test]
fn error_class_exit_codes() {
    let codes: Vec<i32> = [
        ProgramError::InvalidRegister(String::new()),
        ProgramError::InvalidLabel(String::new()),
        ProgramError::InvalidAddress(0),
        ProgramError::SyntaxError(String::new()),
        ProgramError::MemoryLimitExceeded {
            instructions: 0,
            limit: 0,
        },
    ]
    .iter()
    .map(ProgramError::exit_code)
    .collect();
    assert_eq!(codes, vec![1, 2, 3, 4, 5]);
}

proptest! {
    #[test]
    fn immediates_round_trip(imm in any::<i32>()) {
        let inst = first(&format!("addi $t0, $t1, {imm}")).unwrap();
        prop_assert_eq!(inst, Instruction::AluImm { op: AluOp::Add, rd: 8, rs: 9, imm });
    }

    #[test]
    fn every_register_name_resolves(idx in 0usize..32) {
        let name = abi::register_name(idx);
        let inst = first(&format!("add {name}, $zero, $zero")).unwrap();
        prop_assert_eq!(inst.dest(), Some(idx));
    }

    #[test]
    fn memory_offsets_round_trip(offset in -4096i32..4096) {
        let inst = first(&format!("lw $t0, {offset}($sp)")).unwrap();
        prop_assert_eq!(
            inst,
            Instruction::Load { rt: REG_T0, addr: MemOperand { base: REG_SP, offset } }
        );
    }
}
