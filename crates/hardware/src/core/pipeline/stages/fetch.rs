//! Instruction Fetch (IF) Stage.
//!
//! This module implements the first stage of the instruction pipeline.
//! It reads the instruction store at the current program counter and
//! advances the counter sequentially. Control transfers are resolved later
//! by Decode, which redirects the counter and flushes what was fetched here.

use tracing::trace;

use crate::core::Cpu;
use crate::core::pipeline::latches::{Packet, Slot};
use crate::core::pipeline::signals::ProgramCounter;

/// Executes the instruction fetch stage of the pipeline.
///
/// Returns the slot to place in the IF latch, or `None` once the counter has
/// run past the end of the program. Every fetch is counted against its static
/// instruction, including fetches that a later redirect flushes.
///
/// The caller skips this stage entirely while Decode stalls or redirects.
pub fn fetch_stage(cpu: &mut Cpu, pc: &mut ProgramCounter) -> Option<Slot<Packet>> {
    let index = pc.current;
    if index >= cpu.program.len() {
        trace!(stage = "IF", pc = index, "past end of program");
        return None;
    }

    if let Some(count) = cpu.fetch_counts.get_mut(index) {
        *count += 1;
    }
    pc.next = index + 1;
    trace!(stage = "IF", pc = index, "fetched");

    Some(Slot {
        pc: index,
        seq: 0,
        payload: Packet::Fetched,
    })
}
