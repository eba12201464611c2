//! Writeback (WB) Stage.
//!
//! This module implements the final stage of the instruction pipeline. It
//! commits results to the register file and retires every instruction that
//! reaches it. In the split layout two latches feed this stage (the memory
//! path and the ALU bypass); Decode's port schedule guarantees that at most
//! one of them carries a register write in any cycle.

use tracing::trace;

use crate::common::SimError;
use crate::core::Cpu;
use crate::core::pipeline::latches::{ExMemEntry, MemWbEntry, Packet, Slot};

/// Register write carried by `packet`, if any.
const fn register_write(packet: &Packet) -> Option<(usize, i32)> {
    match *packet {
        Packet::Completed(MemWbEntry {
            rd: Some(rd),
            value,
        })
        | Packet::Executed(ExMemEntry::Alu {
            rd: Some(rd),
            value,
        }) => Some((rd, value)),
        _ => None,
    }
}

/// Executes the writeback stage of the pipeline.
///
/// Runs first in every cycle, so a value written here is visible to Decode's
/// register reads in the same cycle. Returns the number of retired instructions.
///
/// # Errors
///
/// `PortConflict` if more than one input carries a register write. Nothing is
/// written in that case.
pub fn wb_stage(
    cpu: &mut Cpu,
    inputs: &[Option<&Slot<Packet>>],
    cycle: u64,
) -> Result<usize, SimError> {
    let arriving: Vec<&Slot<Packet>> = inputs.iter().flatten().copied().collect();

    let writers: Vec<usize> = arriving
        .iter()
        .filter(|slot| register_write(&slot.payload).is_some())
        .map(|slot| slot.pc)
        .collect();
    if writers.len() > 1 {
        return Err(SimError::PortConflict {
            cycle,
            pcs: writers,
        });
    }

    for slot in &arriving {
        if let Some((rd, value)) = register_write(&slot.payload) {
            cpu.state.regs.write(rd, value);
            trace!(stage = "WB", pc = slot.pc, seq = slot.seq, rd, value, "write back");
        } else {
            trace!(stage = "WB", pc = slot.pc, seq = slot.seq, "retire");
        }
        if let Some(Ok(inst)) = cpu.program.get(slot.pc) {
            cpu.stats.record_retired(inst.class());
        }
    }
    Ok(arriving.len())
}
