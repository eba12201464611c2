//! # Fill and Drain Tests
//!
//! An instruction takes one cycle per stage, and a program without hazards
//! retires one instruction per cycle once the pipeline is full. The run ends in
//! the first cycle after which nothing is in flight and nothing is left to fetch.

use pipesim_core::config::Layout;
use pipesim_core::core::pipeline::StepStatus;
use pipesim_core::core::pipeline::traits::PipelineLatch;
use pipesim_core::isa::abi::{REG_SP, REG_T0};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::builder::ProgramBuilder;
use crate::common::harness::TestContext;

/// `n` independent `addi` instructions, each writing its own register.
fn independent_alu(n: usize) -> ProgramBuilder {
    (0..n).fold(ProgramBuilder::new(), |b, i| {
        b.addi(REG_T0 + i, 0, i as i32 + 1)
    })
}

#[rstest]
#[case::classic_one(Layout::Classic, 1, 5)]
#[case::classic_many(Layout::Classic, 6, 10)]
#[case::split_one(Layout::Split, 1, 7)]
#[case::split_many(Layout::Split, 6, 12)]
fn independent_alu_runs_n_plus_depth_minus_one(
    #[case] layout: Layout,
    #[case] n: usize,
    #[case] expected: u64,
    #[values(false, true)] forwarding: bool,
) {
    let mut ctx = TestContext::new(independent_alu(n).build(), layout, forwarding);
    let summary = ctx.run_ok();

    assert_eq!(summary.cycles, expected);
    assert_eq!(summary.fetch_counts, vec![1; n]);
    for i in 0..n {
        assert_eq!(ctx.reg(REG_T0 + i), i as i32 + 1);
    }
    assert_eq!(ctx.stats().total_stalls(), 0);
    assert_eq!(ctx.stats().instructions_retired, n as u64);
}

#[test]
fn split_memory_path_is_nine_stages() {
    let program = independent_alu(2).sw(0, 0, REG_SP).build();
    let mut ctx = TestContext::new(program, Layout::Split, false);
    assert_eq!(ctx.run_ok().cycles, 3 + 9 - 1);
}

#[rstest]
fn empty_program_ends_after_first_cycle(
    #[values(Layout::Classic, Layout::Split)] layout: Layout,
) {
    let mut ctx = TestContext::new(ProgramBuilder::new().build(), layout, false);
    let summary = ctx.run_ok();
    assert_eq!(summary.cycles, 1);
    assert!(summary.fetch_counts.is_empty());
}

#[test]
fn step_after_drain_simulates_nothing() {
    let mut ctx = TestContext::classic(independent_alu(1).build());
    let _ = ctx.run_ok();
    assert_eq!(ctx.sim.step(), Ok(StepStatus::Drained));
    assert_eq!(ctx.sim.cycles(), 5);
}

#[test]
fn seeded_pc_skips_leading_instructions() {
    let mut ctx = TestContext::classic(independent_alu(4).build());
    ctx.sim.seed_pc(2).unwrap();
    let summary = ctx.run_ok();

    assert_eq!(summary.fetch_counts, vec![0, 0, 1, 1]);
    assert_eq!(ctx.reg(REG_T0), 0);
    assert_eq!(ctx.reg(REG_T0 + 2), 3);
    assert_eq!(summary.cycles, 2 + 5 - 1);
}

#[test]
fn every_latch_is_empty_once_drained() {
    let mut ctx = TestContext::new(independent_alu(3).build(), Layout::Split, true);
    let _ = ctx.run_ok();

    let pipeline = &ctx.sim.pipeline;
    for idx in 0..pipeline.layout().depth() - 1 {
        let latch = pipeline.latch(idx).unwrap();
        assert!(latch.is_empty(), "latch {idx} still holds an instruction");
    }
    assert!(pipeline.bypass_latch().is_some_and(PipelineLatch::is_empty));
    assert!(!pipeline.latch(0).unwrap().is_working());
    assert!(pipeline.is_drained());
}

#[test]
fn cycle_limit_stops_a_long_run() {
    let mut ctx = TestContext::classic(independent_alu(8).build());
    let summary = ctx.sim.run_for(4);
    assert_eq!(summary.cycles, 4);
    assert!(!summary.is_success());
    assert_eq!(summary.error(), None);

    let rest = ctx.run_ok();
    assert_eq!(rest.cycles, 8 + 5 - 1);
}
