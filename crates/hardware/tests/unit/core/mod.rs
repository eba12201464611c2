//! Core tests.

/// Pipeline engine tests.
pub mod pipeline;
