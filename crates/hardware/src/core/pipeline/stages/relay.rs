//! Relay stages.
//!
//! The split layout inserts stages that do no work of their own (`IF1`, `ID0`,
//! `RR`, `DM0`). A relay moves its packet one latch forward and, on the way,
//! replaces any forward tag whose producer result is now visible, so the
//! value is not lost once the producer writes back.

use tracing::trace;

use crate::core::pipeline::forwarding::BypassNetwork;
use crate::core::pipeline::latches::{ExMemEntry, IdExEntry, Packet, Slot};

/// Resolves every forward tag in `packet` that the snapshot can satisfy.
pub fn resolve_operands(packet: Packet, network: &BypassNetwork) -> Packet {
    match packet {
        Packet::Decoded(IdExEntry::Alu { op, rd, lhs, rhs }) => Packet::Decoded(IdExEntry::Alu {
            op,
            rd,
            lhs: network.resolve(lhs),
            rhs: network.resolve(rhs),
        }),
        Packet::Decoded(IdExEntry::Load { rd, base, offset }) => {
            Packet::Decoded(IdExEntry::Load {
                rd,
                base: network.resolve(base),
                offset,
            })
        }
        Packet::Decoded(IdExEntry::Store { base, offset, data }) => {
            Packet::Decoded(IdExEntry::Store {
                base: network.resolve(base),
                offset,
                data: network.resolve(data),
            })
        }
        Packet::Executed(ExMemEntry::Store { addr, data }) => Packet::Executed(ExMemEntry::Store {
            addr,
            data: network.resolve(data),
        }),
        other => other,
    }
}

/// Executes a relay stage: the visible input slot, operands refreshed.
pub fn relay_stage(
    name: &'static str,
    input: Option<&Slot<Packet>>,
    network: &BypassNetwork,
) -> Option<Slot<Packet>> {
    let slot = input?;
    trace!(stage = name, pc = slot.pc, seq = slot.seq, "relay");
    Some(Slot {
        payload: resolve_operands(slot.payload, network),
        ..*slot
    })
}
