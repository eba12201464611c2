//! Pipeline stage implementations.
//!
//! This module contains the stage controllers the engine sequences every cycle.
//! It includes:
//! 1. **Fetch:** Reads the instruction store at the program counter.
//! 2. **Decode:** Hazard detection, operand read, branch resolution and issue.
//! 3. **Execute:** ALU operations and effective-address calculation.
//! 4. **Memory:** Data loads and stores.
//! 5. **Writeback:** Commits results to the register file.
//! 6. **Relay:** Pass-through stages of the split layout.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Pass-through stage implementation.
pub mod relay;

/// Writeback stage implementation.
pub mod writeback;

/// Decode stage entry point (ID stage).
pub use decode::decode_stage;
/// Execute stage entry point (EX stage).
pub use execute::execute_stage;
/// Fetch stage entry point (IF stage).
pub use fetch::fetch_stage;
/// Memory stage entry point (MEM stage).
pub use memory::mem_stage;
/// Relay stage entry point.
pub use relay::relay_stage;
/// Writeback stage entry point (WB stage).
pub use writeback::wb_stage;
