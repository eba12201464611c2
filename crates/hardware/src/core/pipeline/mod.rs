//! Instruction pipeline implementation.
//!
//! This module contains the configurable in-order pipeline.
//! It includes the following components:
//! 1. **Layout:** The ordered stage list both topologies are built from.
//! 2. **Latches:** Double-buffered inter-stage buffers and their payloads.
//! 3. **Hazards:** Pending-write tracking and the write-back port schedule.
//! 4. **Forwarding:** The start-of-cycle snapshot of in-flight results.
//! 5. **Signals:** Stall and redirect signals from Decode, and the program counter.
//! 6. **Stages:** Fetch, Decode, Execute, Memory, Writeback and relay stages.
//! 7. **Engine:** The cycle driver.

/// Cycle driver.
pub mod engine;

/// Start-of-cycle forwarding snapshot.
pub mod forwarding;

/// Pipeline hazard detection bookkeeping.
pub mod hazards;

/// Inter-stage pipeline latches.
pub mod latches;

/// Stage graph and timing distances.
pub mod layout;

/// Control signals raised by Decode.
pub mod signals;

/// Pipeline stage implementations.
pub mod stages;

/// Traits for pipeline latches and payloads.
pub mod traits;

pub use engine::{Pipeline, StepStatus};
pub use layout::PipelineLayout;
