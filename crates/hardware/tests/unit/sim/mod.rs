//! Simulation driver tests.


/// Loading programs from disk.
pub mod loader;
