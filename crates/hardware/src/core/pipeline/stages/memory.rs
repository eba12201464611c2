//! Memory Access (MEM) Stage.
//!
//! This module implements the stage that touches data memory. Loads read the
//! word at their effective address and release dependents through the hazard
//! tracker; stores write their (possibly forwarded) data. ALU results pass
//! through unchanged.

use tracing::trace;

use crate::common::{Fault, SimError};
use crate::core::arch::DataMemory;
use crate::core::pipeline::forwarding::BypassNetwork;
use crate::core::pipeline::hazards::HazardTracker;
use crate::core::pipeline::latches::{ExMemEntry, MemWbEntry, Packet, Slot};

/// Executes the memory stage of the pipeline.
///
/// A store mutates memory only after both its address and its data are
/// known to be valid.
///
/// # Errors
///
/// - `InvalidAddress` (as a program fault) if the access is rejected by memory.
/// - `OperandUnavailable` if a store's forwarded data did not arrive.
pub fn mem_stage(
    memory: &mut DataMemory,
    tracker: &mut HazardTracker,
    input: Option<&Slot<Packet>>,
    network: &BypassNetwork,
    cycle: u64,
) -> Result<Option<Slot<Packet>>, SimError> {
    let Some(slot) = input else {
        return Ok(None);
    };
    let Packet::Executed(entry) = slot.payload else {
        return Ok(Some(*slot));
    };
    let pc = slot.pc;
    let fault = |error| Fault { error, pc, cycle };

    let completed = match entry {
        ExMemEntry::Alu { rd, value } => MemWbEntry { rd, value },
        ExMemEntry::Load { rd, addr } => {
            let value = memory.load(addr).map_err(fault)?;
            if let Some(rd) = rd {
                tracker.mark_ready(rd, slot.seq);
            }
            trace!(stage = "MEM", pc, seq = slot.seq, addr, value, "load");
            MemWbEntry { rd, value }
        }
        ExMemEntry::Store { addr, data } => {
            let value = network.require(data, pc, cycle)?;
            memory.store(addr, value).map_err(fault)?;
            trace!(stage = "MEM", pc, seq = slot.seq, addr, value, "store");
            MemWbEntry { rd: None, value }
        }
    };

    Ok(Some(Slot {
        payload: Packet::Completed(completed),
        ..*slot
    }))
}
