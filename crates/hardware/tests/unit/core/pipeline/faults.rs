//! # Precise Fault Tests
//!
//! A faulting cycle is not committed: memory and registers keep exactly the
//! effects of instructions that finished before it, and when several stages
//! fault in one cycle the oldest instruction's error is reported. Faults come
//! out in program order, so every layout reports what the reference
//! interpreter reports.

use pipesim_core::common::{Fault, MEMORY_BYTES, ProgramError, SimError};
use pipesim_core::config::Layout;
use pipesim_core::isa::abi::{REG_SP, REG_T0};
use pipesim_core::sim::loader;
use pipesim_core::sim::reference::Interpreter;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::ProgramBuilder;
use crate::common::harness::{ALL_MODES, TestContext};

fn fault(error: ProgramError, pc: usize, cycle: u64) -> SimError {
    SimError::Program(Fault { error, pc, cycle })
}

#[rstest]
#[case::classic_stalled(Layout::Classic, false, 6)]
#[case::classic_forwarded(Layout::Classic, true, 4)]
#[case::split_stalled(Layout::Split, false, 9)]
#[case::split_forwarded(Layout::Split, true, 7)]
fn misaligned_store_faults_in_execute(
    #[case] layout: Layout,
    #[case] forwarding: bool,
    #[case] cycle: u64,
) {
    let program = ProgramBuilder::new()
        .addi(REG_T0, 0, 7)
        .sw(REG_T0, 1, REG_SP)
        .build();
    let mut ctx = TestContext::new(program, layout, forwarding);
    let summary = ctx.run();

    // `$sp` is 8 for a two-instruction program.
    assert_eq!(
        summary.error(),
        Some(&fault(ProgramError::InvalidAddress(9), 1, cycle))
    );
    assert_eq!(summary.cycles, cycle);
    assert!(ctx.data().is_empty());
    assert_eq!(summary.error().map(SimError::exit_code), Some(3));
}

#[rstest]
#[case::instruction_region(0)]
#[case::last_instruction_word(4)]
#[case::negative(-4)]
#[case::ceiling(MEMORY_BYTES as i32)]
fn load_outside_data_segment(#[case] addr: i32) {
    let program = ProgramBuilder::new()
        .addi(REG_T0, 0, 1)
        .lw(REG_T0, addr, 0)
        .build();
    let mut ctx = TestContext::classic(program);
    let summary = ctx.run();

    assert_eq!(
        summary.error(),
        Some(&fault(ProgramError::InvalidAddress(addr.into()), 1, 4))
    );
}

#[rstest]
#[case::classic(Layout::Classic, 3)]
#[case::split(Layout::Split, 6)]
fn decode_reports_unresolved_operand(#[case] layout: Layout, #[case] cycle: u64) {
    let mut ctx = TestContext::from_asm(
        "addi $t0, $zero, 1\nadd $t1, $t0, $bogus\n",
        layout,
        false,
    );
    let summary = ctx.run();

    assert_eq!(
        summary.error(),
        Some(&fault(ProgramError::InvalidRegister("$bogus".into()), 1, cycle))
    );
    assert_eq!(summary.error().map(SimError::exit_code), Some(1));
    assert_eq!(ctx.stats().stalls_data, 0);
}

#[test]
fn undefined_label_faults_only_when_reached() {
    let mut ctx = TestContext::from_asm(
        "j done\nj nowhere\ndone: addi $t0, $zero, 4\n",
        Layout::Classic,
        false,
    );
    let _ = ctx.run_ok();
    assert_eq!(ctx.reg(REG_T0), 4);

    let mut ctx = TestContext::from_asm("j nowhere\n", Layout::Classic, false);
    let summary = ctx.run();
    assert_eq!(
        summary.error(),
        Some(&fault(ProgramError::InvalidLabel("nowhere".into()), 0, 2))
    );
}

#[rstest]
#[case::classic_stalled(Layout::Classic, false, 3)]
#[case::classic_forwarded(Layout::Classic, true, 3)]
#[case::split_stalled(Layout::Split, false, 6)]
#[case::split_forwarded(Layout::Split, true, 6)]
fn oldest_fault_wins(#[case] layout: Layout, #[case] forwarding: bool, #[case] cycle: u64) {
    // The younger `add` reaches Decode before the store reaches Execute in the
    // split layout; its load-time error waits for the store.
    let mut ctx = TestContext::from_asm(
        "sw $zero, 2($zero)\nadd $t0, $t0, $bogus\n",
        layout,
        forwarding,
    );
    let summary = ctx.run();
    assert_eq!(
        summary.error(),
        Some(&fault(ProgramError::InvalidAddress(2), 0, cycle))
    );
}

#[rstest]
#[case::store_before_bad_register("sw $zero, 2($zero)\nadd $t0, $t0, $bogus\n")]
#[case::dependent_store_before_bad_register(
    "addi $t0, $zero, 1\nsw $t0, 3($sp)\nor $t1, $t0, $nope\n"
)]
#[case::branch_skips_bad_line(
    "beq $zero, $zero, skip\nadd $t0, $t0, $bad\nskip: lw $t1, 1($zero)\n"
)]
#[case::load_before_missing_label("lw $t0, 6($sp)\nj nowhere\n")]
fn fault_matches_reference(#[case] source: &str) {
    let expected = Interpreter::new(loader::parse(source).unwrap())
        .run()
        .unwrap_err();

    for (layout, forwarding) in ALL_MODES {
        let mut ctx = TestContext::from_asm(source, layout, forwarding);
        let summary = ctx.run();
        let Some(SimError::Program(got)) = summary.error() else {
            panic!("{layout:?}, forwarding={forwarding}: {:?}", summary.exit);
        };
        assert_eq!(
            (&got.error, got.pc),
            (&expected.error, expected.pc),
            "{layout:?}, forwarding={forwarding}"
        );
    }
}

#[test]
fn completed_writes_survive_the_fault() {
    let program = ProgramBuilder::new()
        .addi(REG_T0, 0, 3)
        .sw(REG_T0, 0, REG_SP)
        .sw(REG_T0, 2, REG_SP)
        .build();
    let mut ctx = TestContext::classic(program);
    let summary = ctx.run();

    assert!(matches!(
        summary.error(),
        Some(SimError::Program(Fault {
            error: ProgramError::InvalidAddress(14),
            pc: 2,
            ..
        }))
    ));
    assert_eq!(ctx.reg(REG_T0), 3);
    assert_eq!(ctx.data(), vec![(12, 3)]);
}
