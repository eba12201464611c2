//! ISA tests.

/// Operand resolution through the loader.
pub mod decode_properties;
