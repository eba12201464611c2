//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the double-buffered latch and the entry types carried
//! across each stage boundary:
//! Fetch → Decode (`Fetched`) → Execute (`IdExEntry`) → Memory (`ExMemEntry`) → WriteBack (`MemWbEntry`).
//!
//! 1. **Double Buffering:** Stages read `current` and write `next`; `commit` swaps at cycle end.
//! 2. **Drain Propagation:** Each latch carries a working flag that follows the instruction stream.
//! 3. **Operand Tags:** Operands are either values or tags naming the producer to forward from.

use super::traits::{ForwardSource, PipelineLatch};
use crate::isa::AluOp;

/// A source operand as carried down the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// The value is known.
    Ready(i32),
    /// The value will be forwarded from the in-flight producer `seq`.
    Forward {
        /// Register the value is destined for.
        reg: usize,
        /// Sequence number of the producing instruction.
        seq: u64,
    },
}

impl Operand {
    /// The value, if already known.
    pub const fn value(&self) -> Option<i32> {
        match self {
            Self::Ready(v) => Some(*v),
            Self::Forward { .. } => None,
        }
    }
}

/// Entry in the ID/EX latch: an issued instruction with its operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdExEntry {
    /// Register or immediate ALU operation.
    Alu {
        /// Operation.
        op: AluOp,
        /// Destination register (`None` for `$0`).
        rd: Option<usize>,
        /// First operand.
        lhs: Operand,
        /// Second operand.
        rhs: Operand,
    },
    /// `lw`.
    Load {
        /// Destination register (`None` for `$0`).
        rd: Option<usize>,
        /// Base register value.
        base: Operand,
        /// Byte offset.
        offset: i32,
    },
    /// `sw`.
    Store {
        /// Base register value.
        base: Operand,
        /// Byte offset.
        offset: i32,
        /// Value to store.
        data: Operand,
    },
}

/// Entry in the EX/MEM latch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExMemEntry {
    /// Finished ALU result.
    Alu {
        /// Destination register (`None` for `$0`).
        rd: Option<usize>,
        /// Result.
        value: i32,
    },
    /// Load with its effective address.
    Load {
        /// Destination register (`None` for `$0`).
        rd: Option<usize>,
        /// Effective byte address.
        addr: i64,
    },
    /// Store with its effective address.
    Store {
        /// Effective byte address.
        addr: i64,
        /// Value to store.
        data: Operand,
    },
}

/// Entry in the MEM/WB latch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemWbEntry {
    /// Register to write, if any.
    pub rd: Option<usize>,
    /// Value to write.
    pub value: i32,
}

/// Payload of a latch slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Packet {
    /// Fetched, not yet decoded. The instruction is found through the slot's `pc`.
    Fetched,
    /// Issued by Decode.
    Decoded(IdExEntry),
    /// Past Execute.
    Executed(ExMemEntry),
    /// Past Memory, ready to write back.
    Completed(MemWbEntry),
}

impl ForwardSource for Packet {
    fn forwarded_value(&self) -> Option<i32> {
        match self {
            Self::Executed(ExMemEntry::Alu { value, .. }) => Some(*value),
            Self::Completed(MemWbEntry { rd: Some(_), value }) => Some(*value),
            _ => None,
        }
    }
}

/// One in-flight instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot<T> {
    /// Static index of the instruction.
    pub pc: usize,
    /// Dynamic sequence number, assigned at issue (0 before Decode).
    pub seq: u64,
    /// Stage-specific payload.
    pub payload: T,
}

/// Double-buffered latch between two adjacent stages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Latch<T> {
    current: Option<Slot<T>>,
    next: Option<Slot<T>>,
    working: bool,
    next_working: bool,
    held: bool,
}

impl<T> Default for Latch<T> {
    fn default() -> Self {
        Self {
            current: None,
            next: None,
            working: true,
            next_working: true,
            held: false,
        }
    }
}

impl<T> Latch<T> {
    /// Creates an empty, working latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry visible to the downstream stage this cycle.
    pub const fn current(&self) -> Option<&Slot<T>> {
        self.current.as_ref()
    }

    /// Entry written this cycle, visible after commit.
    pub const fn pending(&self) -> Option<&Slot<T>> {
        self.next.as_ref()
    }

    /// Writes the entry that becomes visible after commit.
    pub fn push(&mut self, slot: Slot<T>) {
        self.next = Some(slot);
    }

    /// Whether instructions may still arrive through this latch.
    pub const fn is_working(&self) -> bool {
        self.working
    }

    /// Sets the working flag that takes effect at commit.
    pub const fn set_next_working(&mut self, working: bool) {
        self.next_working = working;
    }

    /// Places an entry directly in the visible position.
    ///
    /// Intended for seeding a latch before a cycle runs.
    pub fn preload(&mut self, slot: Slot<T>) {
        self.current = Some(slot);
    }
}

impl<T> PipelineLatch for Latch<T> {
    fn flush(&mut self) {
        self.current = None;
        self.next = None;
        self.held = false;
    }

    fn hold(&mut self) {
        self.held = true;
    }

    fn commit(&mut self) {
        if self.held {
            self.held = false;
            self.next = None;
        } else {
            self.current = self.next.take();
        }
        self.working = self.next_working;
    }

    fn is_empty(&self) -> bool {
        self.current.is_none()
    }
}
