//! Forwarding network.
//!
//! At the start of every cycle the engine captures the results visible in all
//! latches, keyed by producer sequence number. Stages resolve `Forward` tags
//! only against this snapshot, so a value produced later in the same cycle is
//! never observed early.

use super::latches::{Latch, Operand};
use super::traits::ForwardSource;
use crate::common::SimError;

/// Start-of-cycle snapshot of in-flight results.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BypassNetwork {
    values: Vec<(u64, i32)>,
}

impl BypassNetwork {
    /// Captures the results held in the visible side of `latches`.
    pub fn capture<'a, T, I>(latches: I) -> Self
    where
        T: ForwardSource + 'a,
        I: IntoIterator<Item = &'a Latch<T>>,
    {
        let values = latches
            .into_iter()
            .filter_map(Latch::current)
            .filter_map(|slot| slot.payload.forwarded_value().map(|v| (slot.seq, v)))
            .collect();
        Self { values }
    }

    /// Result of producer `seq`, if it is in flight and computed.
    pub fn lookup(&self, seq: u64) -> Option<i32> {
        self.values
            .iter()
            .find_map(|&(s, v)| (s == seq).then_some(v))
    }

    /// Replaces a forward tag with its value when the producer's result is visible.
    pub fn resolve(&self, operand: Operand) -> Operand {
        match operand {
            Operand::Forward { seq, .. } => self.lookup(seq).map_or(operand, Operand::Ready),
            Operand::Ready(_) => operand,
        }
    }

    /// Value of `operand` for a stage that cannot wait any longer.
    ///
    /// # Errors
    ///
    /// `OperandUnavailable` if the producer's result is not visible this cycle.
    pub fn require(&self, operand: Operand, pc: usize, cycle: u64) -> Result<i32, SimError> {
        match self.resolve(operand) {
            Operand::Ready(v) => Ok(v),
            Operand::Forward { reg, .. } => Err(SimError::OperandUnavailable { pc, reg, cycle }),
        }
    }

    /// Number of visible results.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no results are visible.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
