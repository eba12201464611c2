//! Instruction store.
//!
//! A [`Program`] is the immutable, ordered list of instructions a run executes,
//! together with the source text of each one (for reports) and the label
//! table. Every record is resolved once at construction; a record that fails
//! to resolve keeps its error, which the pipeline raises only if Decode ever
//! reaches that instruction.

use crate::common::{MEMORY_WORDS, ProgramError};
use crate::isa::decode::{self, InstructionRecord, LabelTable};
use crate::isa::Instruction;

/// Immutable instruction sequence plus label table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    decoded: Vec<Result<Instruction, ProgramError>>,
    source: Vec<String>,
    labels: LabelTable,
}

impl Program {
    /// Resolves `records` against `labels`.
    ///
    /// # Errors
    ///
    /// `MemoryLimitExceeded` when the program would not leave room for any data.
    pub fn new(records: &[InstructionRecord], labels: LabelTable) -> Result<Self, ProgramError> {
        check_size(records.len())?;
        let decoded = records.iter().map(|r| decode::resolve(r, &labels)).collect();
        let source = records.iter().map(InstructionRecord::text).collect();
        Ok(Self {
            decoded,
            source,
            labels,
        })
    }

    /// Builds a program from already-typed instructions.
    ///
    /// Branch and jump targets are taken as instruction indices; no labels are defined.
    pub fn from_instructions(instructions: &[Instruction]) -> Result<Self, ProgramError> {
        check_size(instructions.len())?;
        Ok(Self {
            decoded: instructions.iter().copied().map(Ok).collect(),
            source: instructions.iter().map(ToString::to_string).collect(),
            labels: LabelTable::new(),
        })
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.decoded.len()
    }

    /// Whether the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.decoded.is_empty()
    }

    /// The resolved instruction at `index`, or the error that resolving it produced.
    pub fn get(&self, index: usize) -> Option<&Result<Instruction, ProgramError>> {
        self.decoded.get(index)
    }

    /// Source text of the instruction at `index`.
    pub fn source(&self, index: usize) -> Option<&str> {
        self.source.get(index).map(String::as_str)
    }

    /// The label table the program was resolved against.
    pub const fn labels(&self) -> &LabelTable {
        &self.labels
    }
}

fn check_size(instructions: usize) -> Result<(), ProgramError> {
    if instructions >= MEMORY_WORDS {
        return Err(ProgramError::MemoryLimitExceeded {
            instructions,
            limit: MEMORY_WORDS,
        });
    }
    Ok(())
}
