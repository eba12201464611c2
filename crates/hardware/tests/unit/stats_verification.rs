//! # Statistics Verification Tests
//!
//! Counters gathered by real runs: instruction mix, stall classes, control
//! bubbles and CPI.

use pipesim_core::config::Layout;
use pipesim_core::isa::abi::{REG_SP, REG_T0, REG_T1};
use pipesim_core::stats::{STATS_SECTIONS, SimStats};
use pretty_assertions::assert_eq;

use crate::common::builder::ProgramBuilder;
use crate::common::harness::TestContext;

fn mixed_program() -> ProgramBuilder {
    ProgramBuilder::new()
        .addi(REG_T0, 0, 2)
        .sw(REG_T0, 0, REG_SP)
        .lw(REG_T1, 0, REG_SP)
        .beq(REG_T1, REG_T0, 5)
        .addi(REG_T0, 0, 9)
        .j(6)
}

#[test]
fn test_instruction_mix() {
    let mut ctx = TestContext::new(mixed_program().build(), Layout::Classic, true);
    let _ = ctx.run_ok();
    let stats = ctx.stats();

    assert_eq!(stats.inst_alu, 1);
    assert_eq!(stats.inst_store, 1);
    assert_eq!(stats.inst_load, 1);
    assert_eq!(stats.inst_branch, 1);
    assert_eq!(stats.inst_jump, 1);
    assert_eq!(stats.instructions_retired, 5);
    assert_eq!(stats.branches_taken, 1);
    assert_eq!(stats.control_bubbles, 2);
    assert_eq!(ctx.reg(REG_T0), 2);
}

#[test]
fn test_cycles_match_summary() {
    let mut ctx = TestContext::new(mixed_program().build(), Layout::Split, false);
    let summary = ctx.run_ok();
    assert_eq!(ctx.stats().cycles, summary.cycles);
    assert!(ctx.stats().cpi() > 1.0);
}

#[test]
fn test_forwarding_reduces_stalls() {
    let stalls = |forwarding| {
        let mut ctx = TestContext::new(mixed_program().build(), Layout::Classic, forwarding);
        let _ = ctx.run_ok();
        (ctx.stats().stalls_data, ctx.stats().forwarded_operands)
    };
    let (without, none_forwarded) = stalls(false);
    let (with, forwarded) = stalls(true);
    assert!(with < without, "{with} >= {without}");
    assert_eq!(none_forwarded, 0);
    assert!(forwarded > 0);
}

#[test]
fn test_render_all_sections() {
    let mut ctx = TestContext::classic(mixed_program().build());
    let _ = ctx.run_ok();
    let text = ctx.stats().render_sections(&[]);
    assert!(text.contains("PIPELINE SIMULATION STATISTICS"));
    assert!(text.contains("HAZARDS"));
    assert!(text.contains("INSTRUCTION MIX"));
    assert!(text.contains("op.jump"));
    assert_eq!(STATS_SECTIONS.len(), 3);
}

#[test]
fn test_cpi_before_any_retirement() {
    assert!(SimStats::default().cpi().abs() < f64::EPSILON);
}
