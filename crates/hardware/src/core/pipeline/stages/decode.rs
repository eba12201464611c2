//! Instruction Decode (ID) Stage.
//!
//! This module implements the stage that decides whether an instruction may
//! enter the back end. It performs the following:
//! 1. **Hazard Detection:** Checks every source register against the hazard tracker
//!    and either reads it, tags it for forwarding, or stalls.
//! 2. **Structural Checks:** Refuses to issue when the destination's previous producer
//!    would write back no earlier than this one, or when the write port is taken.
//! 3. **Branch Resolution:** Evaluates `beq`/`bne` and `j` and raises a redirect.
//! 4. **Issue:** Records the destination in the tracker, reserves the write-back
//!    cycle and emits an [`IdExEntry`].

use tracing::trace;

use crate::common::Fault;
use crate::core::Cpu;
use crate::core::arch::RegisterFile;
use crate::core::pipeline::forwarding::BypassNetwork;
use crate::core::pipeline::hazards::{HazardTracker, PortSchedule, ProducerClass};
use crate::core::pipeline::latches::{IdExEntry, Operand, Packet, Slot};
use crate::core::pipeline::layout::PipelineLayout;
use crate::core::pipeline::signals::{CycleSignals, Redirect, StallCause};
use crate::isa::{AluOp, InstClass, Instruction};

/// Hazard state Decode consults and updates.
#[derive(Debug)]
pub struct IssueContext<'a> {
    /// Stage geometry, for every distance.
    pub layout: &'a PipelineLayout,
    /// Whether operands may be forwarded instead of stalling.
    pub forwarding: bool,
    /// Pending register writes.
    pub tracker: &'a mut HazardTracker,
    /// Reserved write-back cycles.
    pub ports: &'a mut PortSchedule,
    /// Start-of-cycle snapshot of in-flight results.
    pub network: &'a BypassNetwork,
    /// Current cycle (1-based).
    pub cycle: u64,
    /// Sequence number the instruction receives if it issues or resolves.
    pub seq: u64,
    /// Whether an issued instruction has not reached Execute yet.
    pub older_in_flight: bool,
}

/// What Decode did this cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecodeOutput {
    /// Stall and redirect signals for the front end.
    pub signals: CycleSignals,
    /// Instruction issued to the next latch.
    pub issued: Option<Slot<Packet>>,
}

impl DecodeOutput {
    /// Whether the instruction in Decode left it this cycle.
    pub const fn consumed(&self) -> bool {
        self.issued.is_some() || self.signals.redirect.is_some()
    }
}

/// Decode's plan for one instruction once its operands are available.
enum Plan {
    Issue {
        entry: IdExEntry,
        dest: Option<(usize, ProducerClass)>,
    },
    Control(Redirect),
}

/// Reads source registers according to the hazard rules.
struct OperandReader<'a> {
    regs: &'a RegisterFile,
    tracker: &'a HazardTracker,
    network: &'a BypassNetwork,
    layout: &'a PipelineLayout,
    forwarding: bool,
    forwarded: u64,
}

impl OperandReader<'_> {
    /// Operand for `reg`, needed `need` cycles after issue.
    fn read(&mut self, reg: usize, need: usize) -> Result<Operand, StallCause> {
        if reg == 0 {
            return Ok(Operand::Ready(0));
        }
        let Some(entry) = self.tracker.get(reg) else {
            return Ok(Operand::Ready(self.regs.read(reg)));
        };
        if !self.forwarding {
            return Err(StallCause::Data { reg });
        }
        if let (true, Some(v)) = (entry.ready, self.network.lookup(entry.seq)) {
            self.forwarded += 1;
            return Ok(Operand::Ready(v));
        }
        let avail = self.layout.available_after(entry.class);
        if need > 0 && entry.age + need > avail {
            self.forwarded += 1;
            return Ok(Operand::Forward {
                reg,
                seq: entry.seq,
            });
        }
        Err(StallCause::Data { reg })
    }

    /// Value of `reg`, needed right now.
    fn read_now(&mut self, reg: usize) -> Result<i32, StallCause> {
        match self.read(reg, 0)? {
            Operand::Ready(v) => Ok(v),
            Operand::Forward { reg, .. } => Err(StallCause::Data { reg }),
        }
    }
}

/// Destination register as carried down the pipeline; `$0` writes are dropped.
const fn destination(reg: usize) -> Option<usize> {
    if reg == 0 { None } else { Some(reg) }
}

fn plan(inst: Instruction, pc: usize, reader: &mut OperandReader<'_>) -> Result<Plan, StallCause> {
    let ex = reader.layout.ex_distance();
    let mem = reader.layout.mem_distance();
    let alu = |op: AluOp, rd: usize, lhs: Operand, rhs: Operand| Plan::Issue {
        entry: IdExEntry::Alu {
            op,
            rd: destination(rd),
            lhs,
            rhs,
        },
        dest: destination(rd).map(|r| (r, ProducerClass::Alu)),
    };

    Ok(match inst {
        Instruction::AluReg { op, rd, rs, rt } => {
            let lhs = reader.read(rs, ex)?;
            let rhs = reader.read(rt, ex)?;
            alu(op, rd, lhs, rhs)
        }
        Instruction::AluImm { op, rd, rs, imm } => {
            let lhs = reader.read(rs, ex)?;
            alu(op, rd, lhs, Operand::Ready(imm))
        }
        Instruction::Load { rt, addr } => Plan::Issue {
            entry: IdExEntry::Load {
                rd: destination(rt),
                base: reader.read(addr.base, ex)?,
                offset: addr.offset,
            },
            dest: destination(rt).map(|r| (r, ProducerClass::Load)),
        },
        Instruction::Store { rt, addr } => {
            let base = reader.read(addr.base, ex)?;
            let data = reader.read(rt, mem)?;
            Plan::Issue {
                entry: IdExEntry::Store {
                    base,
                    offset: addr.offset,
                    data,
                },
                dest: None,
            }
        }
        Instruction::Branch {
            cond,
            rs,
            rt,
            target,
        } => {
            let a = reader.read_now(rs)?;
            let b = reader.read_now(rt)?;
            let taken = cond.holds(a, b);
            Plan::Control(Redirect {
                target: if taken { target } else { pc + 1 },
                taken,
            })
        }
        Instruction::Jump { target } => Plan::Control(Redirect {
            target,
            taken: true,
        }),
    })
}

/// Checks that a producer of `reg` with latency `class` may issue this cycle.
fn check_destination(
    ctx: &IssueContext<'_>,
    reg: usize,
    class: ProducerClass,
) -> Result<(), StallCause> {
    let wb = ctx.layout.writeback_after(class);
    if ctx
        .tracker
        .get(reg)
        .is_some_and(|prev| prev.age + wb <= prev.retire_at)
    {
        return Err(StallCause::WriteAfterWrite { reg });
    }
    if !ctx.ports.is_free(ctx.cycle + wb as u64) {
        return Err(StallCause::Port);
    }
    Ok(())
}

/// Executes the instruction decode stage.
///
/// Consumes the instruction visible in the upstream latch, if any. Returns the
/// packet to place in the downstream latch together with the control signals
/// for the front end. A stall leaves the instruction where it is; the caller
/// must hold the upstream latches.
///
/// # Errors
///
/// The program error stored for this instruction, if operand resolution failed
/// when the program was loaded. While an older instruction is still on its way
/// to Execute the error is held and Decode stalls instead, so faults surface in
/// program order.
pub fn decode_stage(
    cpu: &mut Cpu,
    input: Option<&Slot<Packet>>,
    ctx: &mut IssueContext<'_>,
) -> Result<DecodeOutput, Fault> {
    let Some(slot) = input else {
        trace!(stage = "ID", "bubble");
        return Ok(DecodeOutput::default());
    };
    let pc = slot.pc;
    let inst = match cpu.program.get(pc) {
        Some(Ok(inst)) => *inst,
        Some(Err(error)) if ctx.older_in_flight => {
            trace!(stage = "ID", pc, %error, "fault held behind older instruction");
            return Ok(DecodeOutput {
                signals: CycleSignals {
                    stall: Some(StallCause::OlderInFlight),
                    redirect: None,
                },
                issued: None,
            });
        }
        Some(Err(error)) => {
            return Err(Fault {
                error: error.clone(),
                pc,
                cycle: ctx.cycle,
            });
        }
        None => return Ok(DecodeOutput::default()),
    };

    let mut reader = OperandReader {
        regs: &cpu.state.regs,
        tracker: ctx.tracker,
        network: ctx.network,
        layout: ctx.layout,
        forwarding: ctx.forwarding,
        forwarded: 0,
    };
    let planned = plan(inst, pc, &mut reader);
    let forwarded = reader.forwarded;

    let planned = planned.and_then(|p| match p {
        Plan::Issue {
            dest: Some((reg, class)),
            ..
        } => check_destination(ctx, reg, class).map(|()| p),
        _ => Ok(p),
    });

    let mut out = DecodeOutput::default();
    match planned {
        Err(cause) => {
            trace!(stage = "ID", pc, ?cause, "stall: {inst}");
            if cause.is_structural() {
                cpu.stats.stalls_structural += 1;
            } else {
                cpu.stats.stalls_data += 1;
            }
            out.signals.stall = Some(cause);
        }
        Ok(Plan::Control(redirect)) => {
            trace!(
                stage = "ID",
                pc,
                next_pc = redirect.target,
                taken = redirect.taken,
                "resolved: {inst}"
            );
            cpu.stats.record_retired(inst.class());
            if inst.class() == InstClass::Branch && redirect.taken {
                cpu.stats.branches_taken += 1;
            }
            cpu.stats.control_bubbles += ctx.layout.decode_index() as u64;
            out.signals.redirect = Some(redirect);
        }
        Ok(Plan::Issue { entry, dest }) => {
            if let Some((reg, class)) = dest {
                let wb = ctx.layout.writeback_after(class);
                ctx.tracker.record(reg, class, ctx.seq, wb);
                let _ = ctx.ports.reserve(ctx.cycle + wb as u64);
            }
            cpu.stats.forwarded_operands += forwarded;
            trace!(stage = "ID", pc, seq = ctx.seq, "issued: {inst}");
            out.issued = Some(Slot {
                pc,
                seq: ctx.seq,
                payload: Packet::Decoded(entry),
            });
        }
    }
    Ok(out)
}
