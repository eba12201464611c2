//! Execute (EX) Stage.
//!
//! This module implements the only stage that does arithmetic. It performs the following:
//! 1. **Operand Capture:** Replaces forward tags with the producer's result.
//! 2. **ALU:** Computes register and immediate operations and marks the result
//!    ready in the hazard tracker.
//! 3. **Address Generation:** Computes base + offset for loads and stores and
//!    rejects addresses the data memory would not accept.

use tracing::trace;

use crate::common::{Fault, SimError};
use crate::core::arch::DataMemory;
use crate::core::pipeline::forwarding::BypassNetwork;
use crate::core::pipeline::hazards::HazardTracker;
use crate::core::pipeline::latches::{ExMemEntry, IdExEntry, Packet, Slot};

/// Effective address of a memory instruction, validated against `memory`.
fn effective_address(
    memory: &DataMemory,
    base: i32,
    offset: i32,
    pc: usize,
    cycle: u64,
) -> Result<i64, Fault> {
    let addr = i64::from(base) + i64::from(offset);
    memory
        .word_index(addr)
        .map(|_| addr)
        .map_err(|error| Fault { error, pc, cycle })
}

/// Executes the execute stage of the pipeline.
///
/// Every operand an ALU operation or address computation needs must be
/// available by now; store data may still be in flight and is resolved later.
///
/// # Errors
///
/// - `InvalidAddress` (as a program fault) for a misaligned or out-of-range
///   effective address.
/// - `OperandUnavailable` if a forwarded operand did not arrive.
pub fn execute_stage(
    memory: &DataMemory,
    tracker: &mut HazardTracker,
    input: Option<&Slot<Packet>>,
    network: &BypassNetwork,
    cycle: u64,
) -> Result<Option<Slot<Packet>>, SimError> {
    let Some(slot) = input else {
        return Ok(None);
    };
    let Packet::Decoded(entry) = slot.payload else {
        return Ok(Some(*slot));
    };
    let pc = slot.pc;

    let result = match entry {
        IdExEntry::Alu { op, rd, lhs, rhs } => {
            let a = network.require(lhs, pc, cycle)?;
            let b = network.require(rhs, pc, cycle)?;
            let value = op.apply(a, b);
            if let Some(rd) = rd {
                tracker.mark_ready(rd, slot.seq);
            }
            trace!(stage = "EX", pc, seq = slot.seq, value, "{} {a}, {b}", op.mnemonic());
            ExMemEntry::Alu { rd, value }
        }
        IdExEntry::Load { rd, base, offset } => {
            let base = network.require(base, pc, cycle)?;
            let addr = effective_address(memory, base, offset, pc, cycle)?;
            trace!(stage = "EX", pc, seq = slot.seq, addr, "load address");
            ExMemEntry::Load { rd, addr }
        }
        IdExEntry::Store { base, offset, data } => {
            let base = network.require(base, pc, cycle)?;
            let addr = effective_address(memory, base, offset, pc, cycle)?;
            trace!(stage = "EX", pc, seq = slot.seq, addr, "store address");
            ExMemEntry::Store {
                addr,
                data: network.resolve(data),
            }
        }
    };

    Ok(Some(Slot {
        payload: Packet::Executed(result),
        ..*slot
    }))
}
