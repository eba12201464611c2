//! Shared helpers for the integration tests.

/// Program builders.
pub mod builder;
