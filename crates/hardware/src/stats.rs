//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the pipeline simulator. It provides:
//! 1. **Cycle and CPI:** Total cycles, retired instructions, and derived metrics.
//! 2. **Instruction mix:** Counts by class (ALU, load, store, branch, jump).
//! 3. **Hazards:** Data and structural stall cycles, control bubbles, flushed
//!    instructions, taken branches and forwarded operands.

use std::time::Instant;

use crate::isa::InstClass;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions retired (written back, or resolved for control transfers).
    pub instructions_retired: u64,

    /// Count of ALU instructions retired.
    pub inst_alu: u64,
    /// Count of `lw` instructions retired.
    pub inst_load: u64,
    /// Count of `sw` instructions retired.
    pub inst_store: u64,
    /// Count of `beq`/`bne` instructions resolved.
    pub inst_branch: u64,
    /// Count of `j` instructions resolved.
    pub inst_jump: u64,

    /// Cycles Decode stalled on a true data dependency.
    pub stalls_data: u64,
    /// Cycles Decode stalled on write ordering or the write-back port.
    pub stalls_structural: u64,
    /// Decode cycles lost to resolved branches and jumps.
    pub control_bubbles: u64,
    /// Wrong-path instructions discarded by a redirect.
    pub flushed: u64,
    /// Branches whose condition held.
    pub branches_taken: u64,
    /// Source operands supplied by forwarding instead of the register file.
    pub forwarded_operands: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_jump: 0,
            stalls_data: 0,
            stalls_structural: 0,
            control_bubbles: 0,
            flushed: 0,
            branches_taken: 0,
            forwarded_operands: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"hazards"`, `"instruction_mix"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "hazards", "instruction_mix"];

impl SimStats {
    /// Counts one retired instruction of `class`.
    pub const fn record_retired(&mut self, class: InstClass) {
        self.instructions_retired += 1;
        match class {
            InstClass::Alu => self.inst_alu += 1,
            InstClass::Load => self.inst_load += 1,
            InstClass::Store => self.inst_store += 1,
            InstClass::Branch => self.inst_branch += 1,
            InstClass::Jump => self.inst_jump += 1,
        }
    }

    /// Total stall cycles of any kind.
    pub const fn total_stalls(&self) -> u64 {
        self.stalls_data + self.stalls_structural
    }

    /// Cycles per retired instruction, or 0 before anything retired.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_retired as f64
        }
    }

    /// Renders the requested statistics sections.
    ///
    /// Each element of `sections` should be one of `"summary"`, `"hazards"` or
    /// `"instruction_mix"`. An empty slice renders all sections.
    pub fn render_sections(&self, sections: &[String]) -> String {
        use std::fmt::Write as _;

        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let cyc = self.cycles.max(1) as f64;
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64, of: f64| (n as f64 / of) * 100.0;
        let mut out = String::new();

        let _ = writeln!(out, "\n==========================================================");
        let _ = writeln!(out, "PIPELINE SIMULATION STATISTICS");
        let _ = writeln!(out, "==========================================================");
        if want("summary") {
            let seconds = self.start_time.elapsed().as_secs_f64();
            let ipc = self.instructions_retired as f64 / cyc;
            let _ = writeln!(out, "host_seconds             {seconds:.4} s");
            let _ = writeln!(out, "sim_cycles               {}", self.cycles);
            let _ = writeln!(out, "sim_insts                {}", self.instructions_retired);
            let _ = writeln!(out, "sim_ipc                  {ipc:.4}");
            let _ = writeln!(out, "sim_cpi                  {:.4}", self.cpi());
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("hazards") {
            let _ = writeln!(out, "HAZARDS");
            let _ = writeln!(
                out,
                "  stalls.data            {} ({:.2}%)",
                self.stalls_data,
                pct(self.stalls_data, cyc)
            );
            let _ = writeln!(
                out,
                "  stalls.structural      {} ({:.2}%)",
                self.stalls_structural,
                pct(self.stalls_structural, cyc)
            );
            let _ = writeln!(
                out,
                "  bubbles.control        {} ({:.2}%)",
                self.control_bubbles,
                pct(self.control_bubbles, cyc)
            );
            let _ = writeln!(out, "  flushed                {}", self.flushed);
            let _ = writeln!(out, "  branches.taken         {}", self.branches_taken);
            let _ = writeln!(out, "  operands.forwarded     {}", self.forwarded_operands);
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        if want("instruction_mix") {
            let _ = writeln!(out, "INSTRUCTION MIX");
            for (name, count) in [
                ("op.alu", self.inst_alu),
                ("op.load", self.inst_load),
                ("op.store", self.inst_store),
                ("op.branch", self.inst_branch),
                ("op.jump", self.inst_jump),
            ] {
                let _ = writeln!(
                    out,
                    "  {name:<22} {count} ({:.2}%)",
                    pct(count, instr)
                );
            }
            let _ = writeln!(out, "----------------------------------------------------------");
        }
        let _ = writeln!(out, "==========================================================");
        out
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Pass an empty slice to print all sections.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }
}
