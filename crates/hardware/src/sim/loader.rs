//! Assembly Loader.
//!
//! This module turns assembly text into a [`Program`]. It performs:
//! 1. **Tokenizing:** Strips `#` comments and splits on spaces, tabs and commas.
//! 2. **Label collection:** Accepts `name:` on its own line, `name: instr`,
//!    `name:instr` and `name :instr`; a label binds to the next instruction.
//! 3. **Program construction:** Hands the records and labels to [`Program::new`].

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::program::Program;
use crate::common::ProgramError;
use crate::isa::decode::{InstructionRecord, LabelTable};

/// Errors produced while loading a program from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("could not read {}: {source}", path.display())]
    Io {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The program was rejected before simulation.
    #[error(transparent)]
    Program(#[from] ProgramError),
}

/// Reads and parses an assembly file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Program, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&text)?)
}

/// Parses assembly text into a program.
pub fn parse(text: &str) -> Result<Program, ProgramError> {
    let (records, labels) = parse_records(text);
    Program::new(&records, labels)
}

/// Splits assembly text into instruction records and a label table.
pub fn parse_records(text: &str) -> (Vec<InstructionRecord>, LabelTable) {
    let mut records = Vec::new();
    let mut labels = LabelTable::new();

    for (line_no, line) in text.lines().enumerate() {
        let mut tokens = tokenize(line);
        if tokens.is_empty() {
            continue;
        }
        if let Some(label) = take_label(&mut tokens) {
            labels.define(&label, records.len());
        }
        if tokens.is_empty() {
            continue;
        }
        let mnemonic = tokens.remove(0);
        records.push(InstructionRecord {
            mnemonic,
            operands: tokens,
            line: line_no + 1,
        });
    }

    (records, labels)
}

fn tokenize(line: &str) -> Vec<String> {
    let code = line.split('#').next().unwrap_or_default();
    code.split([' ', '\t', ','])
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Removes a leading label definition from `tokens`, returning its name.
fn take_label(tokens: &mut Vec<String>) -> Option<String> {
    let first = tokens.first()?.clone();

    if let Some(name) = first.strip_suffix(':') {
        let _ = tokens.remove(0);
        return Some(name.to_string());
    }
    if let Some((name, rest)) = first.split_once(':') {
        if rest.is_empty() {
            let _ = tokens.remove(0);
        } else {
            tokens[0] = rest.to_string();
        }
        return Some(name.to_string());
    }
    if let Some(rest) = tokens.get(1).and_then(|t| t.strip_prefix(':')) {
        let rest = rest.to_string();
        let _ = tokens.remove(0);
        if rest.is_empty() {
            let _ = tokens.remove(0);
        } else {
            tokens[0] = rest;
        }
        return Some(first);
    }
    None
}
