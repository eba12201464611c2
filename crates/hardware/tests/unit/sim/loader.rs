//! # Program Loading Tests
//!
//! Loading assembly from disk, including the errors that reject a program
//! before the first cycle.

use std::io::Write;

use pipesim_core::common::{MEMORY_WORDS, ProgramError};
use pipesim_core::sim::loader::{self, LoadError};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

/// Writes `text` to a temporary file.
fn create_temp_source(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_file_success() {
    let file = create_temp_source("# sum\nmain: addi $t0, $zero, 2\n\tadd $t1, $t0, $t0 # double\n");
    let program = loader::load_file(file.path()).unwrap();

    assert_eq!(program.len(), 2);
    assert_eq!(program.source(0), Some("addi $t0, $zero, 2"));
    assert_eq!(program.source(1), Some("add $t1, $t0, $t0"));
    assert_eq!(program.labels().resolve("main"), Ok(0));
}

#[test]
fn test_load_empty_file() {
    let file = create_temp_source("");
    let program = loader::load_file(file.path()).unwrap();
    assert!(program.is_empty());
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.asm");
    let err = loader::load_file(&path).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains("missing.asm"));
}

#[test]
fn test_program_too_large() {
    let file = create_temp_source(&"addi $t0, $t0, 1\n".repeat(MEMORY_WORDS));
    let err = loader::load_file(file.path()).unwrap_err();
    match err {
        LoadError::Program(ProgramError::MemoryLimitExceeded { instructions, limit }) => {
            assert_eq!((instructions, limit), (MEMORY_WORDS, MEMORY_WORDS));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_bad_lines_load_and_fault_later() {
    let file = create_temp_source("addi $t0, $zero, 1\nfrobnicate $t0\n");
    let program = loader::load_file(file.path()).unwrap();
    assert_eq!(program.len(), 2);
    assert!(matches!(program.get(1), Some(Err(ProgramError::SyntaxError(_)))));
}
