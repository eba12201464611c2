//! Pipeline Latch and Payload Interfaces.
//!
//! This module defines the common traits for pipeline components. It provides:
//! 1. **Pipeline Latch Interface:** The end-of-cycle operations every latch supports.
//! 2. **Forward Source Interface:** Lets the bypass network read results out of any payload.

/// A pipeline latch (inter-stage buffer).
pub trait PipelineLatch {
    /// Discards both the visible and the pending entry.
    ///
    /// Called on the latches behind a resolved branch or jump.
    fn flush(&mut self);

    /// Keeps the visible entry for another cycle and drops any pending one.
    fn hold(&mut self);

    /// Atomic end-of-cycle update: the pending entry becomes visible.
    fn commit(&mut self);

    /// Whether no instruction is visible in the latch.
    fn is_empty(&self) -> bool;
}

/// A payload that may carry a computed register value.
pub trait ForwardSource {
    /// The value the producing instruction will write back, once it is known.
    fn forwarded_value(&self) -> Option<i32>;
}
