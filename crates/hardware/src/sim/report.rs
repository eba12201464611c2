//! Exit report.
//!
//! Renders the termination outputs of a run in the format students compare
//! against: an optional error section naming the class and the offending
//! source line, then every non-zero data word, the cycle count and how often
//! each static instruction was fetched.

use std::fmt::{self, Write as _};

use crate::common::SimError;
use crate::core::arch::DataMemory;
use crate::sim::program::Program;
use crate::sim::reference::Interpreter;
use crate::sim::simulator::{RunSummary, Simulator};

/// Everything the exit report prints.
#[derive(Clone, Copy, Debug)]
pub struct ExitReport<'a> {
    program: &'a Program,
    memory: &'a DataMemory,
    cycles: u64,
    counts: &'a [u64],
    error: Option<&'a SimError>,
}

impl<'a> ExitReport<'a> {
    /// Assembles a report from its parts.
    pub const fn new(
        program: &'a Program,
        memory: &'a DataMemory,
        cycles: u64,
        counts: &'a [u64],
        error: Option<&'a SimError>,
    ) -> Self {
        Self {
            program,
            memory,
            cycles,
            counts,
            error,
        }
    }

    /// Report for a pipelined run.
    pub fn for_pipeline(sim: &'a Simulator, summary: &'a RunSummary) -> Self {
        Self::new(
            sim.program(),
            sim.memory(),
            summary.cycles,
            &summary.fetch_counts,
            summary.error(),
        )
    }

    /// Report for a reference-interpreter run.
    pub fn for_reference(interp: &'a Interpreter, error: Option<&'a SimError>) -> Self {
        let cycles = error
            .and_then(SimError::fault)
            .map_or(interp.cycles(), |f| f.cycle);
        Self::new(
            interp.program(),
            interp.memory(),
            cycles,
            interp.executed_counts(),
            error,
        )
    }

    /// The error class line, `Error encountered at:` and the offending source line.
    ///
    /// `None` for a successful run.
    pub fn error_section(&self) -> Option<String> {
        let err = self.error?;
        let mut out = String::new();
        match err.fault() {
            Some(fault) => {
                let _ = writeln!(out, "{}", fault.error.class_message());
                let _ = writeln!(out, "Error encountered at:");
                let _ = writeln!(out, "{}", self.program.source(fault.pc).unwrap_or(""));
            }
            None => {
                let _ = writeln!(out, "Internal simulator error: {err}");
            }
        }
        Some(out)
    }

    /// Process exit status for the run.
    pub fn exit_code(&self) -> i32 {
        self.error.map_or(0, SimError::exit_code)
    }
}

impl fmt::Display for ExitReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nFollowing are the non-zero data values:")?;
        for (addr, value) in self.memory.nonzero_words() {
            writeln!(f, "{}-{}: {value:x}", addr, addr + 3)?;
        }
        writeln!(f, "\nTotal number of cycles: {}", self.cycles)?;
        writeln!(f, "Count of instructions executed:")?;
        for (i, count) in self.counts.iter().enumerate() {
            writeln!(f, "{count} times:\t{}", self.program.source(i).unwrap_or(""))?;
        }
        Ok(())
    }
}

/// Full report text: the error section, if any, followed by the body.
pub fn render(report: &ExitReport<'_>) -> String {
    let mut out = report.error_section().unwrap_or_default();
    out.push_str(&report.to_string());
    out
}
