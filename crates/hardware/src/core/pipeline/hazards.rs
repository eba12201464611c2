//! Data Hazard Bookkeeping.
//!
//! This module keeps the state Decode consults before issuing an instruction.
//! It provides:
//! 1. **Hazard Tracker:** For each register, the latest in-flight producer, how many
//!    cycles ago it issued and when its value reaches the register file.
//! 2. **Port Schedule:** Reserved write-back cycles, so two producers never
//!    present a write-back candidate in the same cycle.

use std::collections::BTreeSet;

use crate::common::NUM_REGS;

/// Latency class of a producing instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProducerClass {
    /// Result computed in Execute.
    Alu,
    /// Result read from memory in the Memory stage.
    Load,
}

/// Pending write to one register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HazardEntry {
    /// Cycles elapsed since the producer issued from Decode.
    pub age: usize,
    /// Latency class of the producer.
    pub class: ProducerClass,
    /// Sequence number of the producer, used to match forwarded values.
    pub seq: u64,
    /// Age at which the producer has written the register file.
    pub retire_at: usize,
    /// Whether the producer has already computed its value.
    pub ready: bool,
}

/// Register → latest pending producer.
///
/// Entries are created when a producer issues and age by one each cycle. An
/// entry disappears once its age reaches `retire_at`; from then on the
/// register file holds the value. Register `$0` is never tracked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HazardTracker {
    entries: [Option<HazardEntry>; NUM_REGS],
}

impl HazardTracker {
    /// Creates a tracker with no pending writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `seq` as the latest producer of `reg`, replacing any older one.
    /// No-op for `$0`.
    pub fn record(&mut self, reg: usize, class: ProducerClass, seq: u64, retire_at: usize) {
        if reg == 0 || retire_at == 0 {
            return;
        }
        self.entries[reg] = Some(HazardEntry {
            age: 0,
            class,
            seq,
            retire_at,
            ready: false,
        });
    }

    /// Pending producer of `reg`, if any.
    pub fn get(&self, reg: usize) -> Option<&HazardEntry> {
        self.entries.get(reg).and_then(Option::as_ref)
    }

    /// Marks the producer `seq` of `reg` as having computed its value.
    ///
    /// Ignored when a younger producer has since taken over the register.
    pub fn mark_ready(&mut self, reg: usize, seq: u64) {
        if let Some(entry) = self.entries.get_mut(reg).and_then(Option::as_mut) {
            if entry.seq == seq {
                entry.ready = true;
            }
        }
    }

    /// Advances every entry by one cycle and drops those that have retired.
    pub fn age(&mut self) {
        for slot in &mut self.entries {
            if let Some(entry) = slot {
                entry.age += 1;
                if entry.age >= entry.retire_at {
                    *slot = None;
                }
            }
        }
    }

    /// Number of registers with a pending producer.
    pub fn pending(&self) -> usize {
        self.entries.iter().flatten().count()
    }
}

/// Reserved register-file write cycles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PortSchedule {
    reserved: BTreeSet<u64>,
}

impl PortSchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nobody writes back in `cycle`.
    pub fn is_free(&self, cycle: u64) -> bool {
        !self.reserved.contains(&cycle)
    }

    /// Claims the write port for `cycle`. Returns `false` if it was already taken.
    pub fn reserve(&mut self, cycle: u64) -> bool {
        self.reserved.insert(cycle)
    }

    /// Forgets reservations for cycles up to and including `cycle`.
    pub fn release_through(&mut self, cycle: u64) {
        self.reserved = self.reserved.split_off(&(cycle + 1));
    }

    /// Number of outstanding reservations.
    pub fn len(&self) -> usize {
        self.reserved.len()
    }

    /// Whether no reservations are outstanding.
    pub fn is_empty(&self) -> bool {
        self.reserved.is_empty()
    }
}
