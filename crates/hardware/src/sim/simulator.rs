//! Simulator: owns both the CPU and the pipeline side-by-side.
//!
//! The pipeline borrows the CPU mutably for each cycle; keeping them as two
//! fields of one struct lets `step` hand out both without interior mutability.

use tracing::{info, warn};

use crate::common::SimError;
use crate::config::Config;
use crate::core::Cpu;
use crate::core::arch::{DataMemory, RegisterFile};
use crate::core::pipeline::{Pipeline, StepStatus};
use crate::sim::program::Program;
use crate::stats::SimStats;

/// Callback invoked after every committed cycle.
#[cfg_attr(test, mockall::automock)]
pub trait CycleObserver {
    /// Called with the 1-based number of the cycle just committed and the register file after it.
    fn on_cycle(&mut self, cycle: u64, regs: &RegisterFile);
}

/// Observer that ignores every cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObserver;

impl CycleObserver for NoObserver {
    fn on_cycle(&mut self, _cycle: u64, _regs: &RegisterFile) {}
}

impl<F: FnMut(u64, &RegisterFile)> CycleObserver for F {
    fn on_cycle(&mut self, cycle: u64, regs: &RegisterFile) {
        self(cycle, regs);
    }
}

/// Why a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Exit {
    /// Every instruction completed.
    Drained,
    /// The run stopped on an error.
    Faulted(SimError),
    /// The caller's cycle limit was reached first.
    CycleLimit,
}

/// Termination outputs of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles simulated, including a faulting cycle.
    pub cycles: u64,
    /// Times each static instruction was fetched.
    pub fetch_counts: Vec<u64>,
    /// How the run ended.
    pub exit: Exit,
}

impl RunSummary {
    /// Whether the program ran to completion.
    pub const fn is_success(&self) -> bool {
        matches!(self.exit, Exit::Drained)
    }

    /// The error that stopped the run, if any.
    pub const fn error(&self) -> Option<&SimError> {
        match &self.exit {
            Exit::Faulted(err) => Some(err),
            Exit::Drained | Exit::CycleLimit => None,
        }
    }
}

/// Top-level simulator: CPU architectural state + pipeline.
#[derive(Clone, Debug)]
pub struct Simulator {
    /// Program, architectural state and statistics.
    pub cpu: Cpu,
    /// Pipeline (latches, hazard tracker, program counter).
    pub pipeline: Pipeline,
    max_cycles: Option<u64>,
    finished: Option<Exit>,
}

impl Simulator {
    /// Creates a simulator for `program` with the given configuration.
    pub fn new(program: Program, config: &Config) -> Self {
        Self {
            cpu: Cpu::new(program),
            pipeline: Pipeline::from_config(&config.pipeline),
            max_cycles: config.general.max_cycles,
            finished: None,
        }
    }

    /// Sets the instruction fetched in the first cycle.
    ///
    /// # Errors
    ///
    /// `AlreadyStarted` once a cycle has run.
    pub const fn seed_pc(&mut self, index: usize) -> Result<(), SimError> {
        self.pipeline.seed_pc(index)
    }

    /// Advances the simulator by one clock cycle.
    ///
    /// After the run has ended every further call returns the same outcome
    /// without simulating anything.
    ///
    /// # Errors
    ///
    /// The fault or engine defect that stopped the run.
    pub fn step(&mut self) -> Result<StepStatus, SimError> {
        match &self.finished {
            Some(Exit::Faulted(err)) => return Err(err.clone()),
            Some(_) => return Ok(StepStatus::Drained),
            None => {}
        }
        match self.pipeline.tick(&mut self.cpu) {
            Ok(StepStatus::Drained) => {
                self.finished = Some(Exit::Drained);
                Ok(StepStatus::Drained)
            }
            Ok(StepStatus::Running) => Ok(StepStatus::Running),
            Err(err) => {
                self.finished = Some(Exit::Faulted(err.clone()));
                Err(err)
            }
        }
    }

    /// Runs until the pipeline drains, faults, or hits the configured cycle limit.
    pub fn run(&mut self) -> RunSummary {
        self.run_with(&mut NoObserver)
    }

    /// Like [`run`](Self::run), calling `observer` after every committed cycle.
    pub fn run_with<O: CycleObserver + ?Sized>(&mut self, observer: &mut O) -> RunSummary {
        let exit = loop {
            if self
                .max_cycles
                .is_some_and(|limit| self.pipeline.cycle() >= limit)
            {
                warn!(cycles = self.pipeline.cycle(), "cycle limit reached");
                break Exit::CycleLimit;
            }
            match self.step() {
                Ok(status) => {
                    observer.on_cycle(self.pipeline.cycle(), &self.cpu.state.regs);
                    if status == StepStatus::Drained {
                        break Exit::Drained;
                    }
                }
                Err(err) => break Exit::Faulted(err),
            }
        };
        info!(cycles = self.pipeline.cycle(), ?exit, "run finished");
        self.summary(exit)
    }

    /// Runs at most `max_cycles` more cycles.
    pub fn run_for(&mut self, max_cycles: u64) -> RunSummary {
        let limit = self.pipeline.cycle() + max_cycles;
        let saved = self.max_cycles.replace(limit);
        let summary = self.run();
        self.max_cycles = saved;
        summary
    }

    fn summary(&self, exit: Exit) -> RunSummary {
        RunSummary {
            cycles: self.cpu.stats.cycles,
            fetch_counts: self.cpu.fetch_counts.clone(),
            exit,
        }
    }

    /// Register file.
    pub const fn registers(&self) -> &RegisterFile {
        &self.cpu.state.regs
    }

    /// Data memory.
    pub const fn memory(&self) -> &DataMemory {
        &self.cpu.state.memory
    }

    /// Program being run.
    pub const fn program(&self) -> &Program {
        &self.cpu.program
    }

    /// Run statistics.
    pub const fn stats(&self) -> &SimStats {
        &self.cpu.stats
    }

    /// Cycles simulated so far.
    pub const fn cycles(&self) -> u64 {
        self.cpu.stats.cycles
    }
}
