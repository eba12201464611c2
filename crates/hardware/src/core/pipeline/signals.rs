//! Per-cycle control signals.
//!
//! Decode is the only stage that steers the front end. Its decisions for the
//! current cycle are collected in [`CycleSignals`] and consumed combinationally
//! by Fetch and the upstream relays later in the same cycle:
//! 1. **Stall:** Decode could not issue; everything upstream holds.
//! 2. **Redirect:** Decode resolved a branch or jump; everything upstream is
//!    flushed and the program counter takes the new value.

/// Why Decode refused to issue this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StallCause {
    /// A source register's producer cannot deliver in time.
    Data {
        /// The blocking source register.
        reg: usize,
    },
    /// The destination's previous producer would write back at the same time or later.
    WriteAfterWrite {
        /// The destination register.
        reg: usize,
    },
    /// The register-file write port is already claimed for this instruction's write-back cycle.
    Port,
    /// The instruction in Decode failed to load, and an older instruction has
    /// yet to reach Execute, where it may fault first.
    OlderInFlight,
}

impl StallCause {
    /// Whether the stall is structural rather than a true data dependency.
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::WriteAfterWrite { .. } | Self::Port)
    }
}

/// Program counter redirection requested by a resolved control transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Redirect {
    /// Instruction index fetched next.
    pub target: usize,
    /// Whether the branch was taken (always `true` for jumps).
    pub taken: bool,
}

/// Signals raised by Decode in one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleSignals {
    /// Set when Decode stalled.
    pub stall: Option<StallCause>,
    /// Set when Decode resolved a branch or jump.
    pub redirect: Option<Redirect>,
}

impl CycleSignals {
    /// Whether Fetch and the upstream relays must stay idle this cycle.
    pub const fn holds_front_end(&self) -> bool {
        self.stall.is_some() || self.redirect.is_some()
    }
}

/// Two-phase program counter.
///
/// `current` is the index Fetch reads this cycle; `next` is what it becomes at
/// commit. Fetch advances `next`, a redirect overrides it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgramCounter {
    /// Index fetched this cycle.
    pub current: usize,
    /// Index fetched next cycle.
    pub next: usize,
}

impl ProgramCounter {
    /// Counter pointing at `index`.
    pub const fn at(index: usize) -> Self {
        Self {
            current: index,
            next: index,
        }
    }

    /// Start of cycle: without any other update the counter stays put.
    pub const fn begin_cycle(&mut self) {
        self.next = self.current;
    }

    /// End of cycle.
    pub const fn commit(&mut self) {
        self.current = self.next;
    }
}
