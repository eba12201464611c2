//! Fluent builders for test inputs.

/// Typed program construction.
pub mod program;

pub use program::ProgramBuilder;
