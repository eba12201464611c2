//! # Latch Occupancy Tests
//!
//! Steps the engine one cycle at a time and checks which instruction each
//! latch holds after every commit.

use pipesim_core::config::Layout;
use pipesim_core::core::pipeline::latches::{ExMemEntry, IdExEntry, Operand, Packet};
use pipesim_core::core::pipeline::traits::PipelineLatch;
use pipesim_core::core::pipeline::{Pipeline, StepStatus};
use pipesim_core::isa::abi::{REG_T0, REG_T1, REG_T2};
use pipesim_core::isa::AluOp;
use pretty_assertions::assert_eq;

use crate::common::builder::ProgramBuilder;
use crate::common::harness::TestContext;

/// Static index held by each latch, `None` for a bubble.
fn occupancy(pipeline: &Pipeline) -> Vec<Option<usize>> {
    (0..pipeline.layout().depth() - 1)
        .map(|i| pipeline.latch(i).and_then(|l| l.current()).map(|s| s.pc))
        .collect()
}

fn raw_program() -> ProgramBuilder {
    ProgramBuilder::new()
        .addi(REG_T0, 0, 5)
        .add(REG_T1, REG_T0, REG_T0)
        .addi(REG_T2, 0, 1)
}

#[test]
fn stall_holds_front_end_and_inserts_bubbles() {
    let mut ctx = TestContext::classic(raw_program().build());

    let expected = [
        vec![Some(0), None, None, None],
        vec![Some(1), Some(0), None, None],
        // `add` waits in IF/ID; a bubble enters ID/EX.
        vec![Some(1), None, Some(0), None],
        vec![Some(1), None, None, Some(0)],
        // `addi` wrote `$t0` at the start of the cycle; `add` issues.
        vec![Some(2), Some(1), None, None],
    ];
    for (cycle, want) in expected.iter().enumerate() {
        assert_eq!(ctx.sim.step(), Ok(StepStatus::Running));
        assert_eq!(
            &occupancy(&ctx.sim.pipeline),
            want,
            "after cycle {}",
            cycle + 1
        );
    }
    assert_eq!(ctx.stats().stalls_data, 2);
    assert_eq!(ctx.sim.pipeline.pc().current, 3);
}

#[test]
fn executed_result_sits_in_ex_mem() {
    let mut ctx = TestContext::classic(raw_program().build());
    for _ in 0..3 {
        let _ = ctx.sim.step().unwrap();
    }
    let slot = ctx.sim.pipeline.latch(2).and_then(|l| l.current()).unwrap();
    assert_eq!(
        slot.payload,
        Packet::Executed(ExMemEntry::Alu {
            rd: Some(REG_T0),
            value: 5
        })
    );
    assert_eq!(ctx.sim.pipeline.tracker().get(REG_T0).map(|e| e.ready), Some(true));
}

#[test]
fn forwarding_tags_operands_at_decode() {
    let mut ctx = TestContext::new(raw_program().build(), Layout::Classic, true);
    for _ in 0..3 {
        let _ = ctx.sim.step().unwrap();
    }
    let producer_seq = 1;
    let slot = ctx.sim.pipeline.latch(1).and_then(|l| l.current()).unwrap();
    assert_eq!(slot.pc, 1);
    assert_eq!(
        slot.payload,
        Packet::Decoded(IdExEntry::Alu {
            op: AluOp::Add,
            rd: Some(REG_T1),
            lhs: Operand::Forward {
                reg: REG_T0,
                seq: producer_seq
            },
            rhs: Operand::Forward {
                reg: REG_T0,
                seq: producer_seq
            },
        })
    );
    assert_eq!(ctx.stats().stalls_data, 0);
}

#[test]
fn split_alu_result_takes_the_bypass() {
    let program = ProgramBuilder::new().addi(REG_T0, 0, 5).build();
    let mut ctx = TestContext::new(program, Layout::Split, false);
    for _ in 0..6 {
        assert_eq!(ctx.sim.step(), Ok(StepStatus::Running));
    }

    let pipeline = &ctx.sim.pipeline;
    assert!(pipeline.latch(5).is_some_and(PipelineLatch::is_empty));
    let bypassed = pipeline.bypass_latch().and_then(|l| l.current()).unwrap();
    assert_eq!(bypassed.pc, 0);

    assert_eq!(ctx.sim.step(), Ok(StepStatus::Drained));
    assert_eq!(ctx.reg(REG_T0), 5);
    assert_eq!(ctx.sim.cycles(), 7);
}
