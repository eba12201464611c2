//! Pipeline driver.
//!
//! This module sequences the stages of a [`PipelineLayout`] through one clock
//! cycle at a time. Every cycle:
//! 1. **Snapshot:** Results visible in the latches are captured for forwarding.
//! 2. **Stages:** WriteBack, Decode, the upstream relays and Fetch run first, so
//!    a same-cycle write is visible to Decode and Decode's stall or redirect
//!    reaches the front end combinationally. Execute, the downstream relays and
//!    Memory follow.
//! 3. **Faults:** If any stage faulted, the oldest fault is returned and nothing
//!    is committed.
//! 4. **Commit:** Flushes or holds are applied, every latch commits, the program
//!    counter commits, the hazard tracker ages and past port reservations are
//!    released.

use tracing::{debug, trace, warn};

use super::forwarding::BypassNetwork;
use super::hazards::{HazardTracker, PortSchedule};
use super::latches::{ExMemEntry, Latch, Packet, Slot};
use super::layout::{PipelineLayout, StageKind};
use super::signals::{CycleSignals, ProgramCounter};
use super::stages::{self, decode::DecodeOutput, decode::IssueContext};
use super::traits::PipelineLatch;
use crate::common::SimError;
use crate::config::PipelineConfig;
use crate::core::Cpu;

/// Result of one cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    /// Instructions remain to fetch or are still in flight.
    Running,
    /// The program counter is past the end and every latch is empty.
    Drained,
}

/// The configurable in-order pipeline.
///
/// Latch `i` sits between stage `i` and stage `i + 1`. With an ALU bypass an
/// extra latch carries ALU results from Execute straight to WriteBack.
#[derive(Clone, Debug)]
pub struct Pipeline {
    layout: PipelineLayout,
    forwarding: bool,
    latches: Vec<Latch<Packet>>,
    bypass: Option<Latch<Packet>>,
    tracker: HazardTracker,
    ports: PortSchedule,
    pc: ProgramCounter,
    next_seq: u64,
    cycle: u64,
}

impl Pipeline {
    /// Creates an empty pipeline of the given shape, fetching from instruction 0.
    pub fn new(layout: PipelineLayout, forwarding: bool) -> Self {
        let latches = (1..layout.depth()).map(|_| Latch::new()).collect();
        let bypass = layout.alu_bypass().then(Latch::new);
        Self {
            layout,
            forwarding,
            latches,
            bypass,
            tracker: HazardTracker::new(),
            ports: PortSchedule::new(),
            pc: ProgramCounter::at(0),
            next_seq: 1,
            cycle: 0,
        }
    }

    /// Creates a pipeline from configuration.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(PipelineLayout::from_config(config.layout), config.forwarding)
    }

    /// Stage geometry.
    pub const fn layout(&self) -> &PipelineLayout {
        &self.layout
    }

    /// Whether forwarding is enabled.
    pub const fn forwarding(&self) -> bool {
        self.forwarding
    }

    /// Number of completed cycles.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Program counter.
    pub const fn pc(&self) -> ProgramCounter {
        self.pc
    }

    /// Latch following stage `idx`.
    pub fn latch(&self, idx: usize) -> Option<&Latch<Packet>> {
        self.latches.get(idx)
    }

    /// The Execute → WriteBack bypass latch, if the layout has one.
    pub const fn bypass_latch(&self) -> Option<&Latch<Packet>> {
        self.bypass.as_ref()
    }

    /// Pending register writes.
    pub const fn tracker(&self) -> &HazardTracker {
        &self.tracker
    }

    /// Reserved write-back cycles.
    pub const fn ports(&self) -> &PortSchedule {
        &self.ports
    }

    /// Sets the instruction fetched in the first cycle.
    ///
    /// # Errors
    ///
    /// `AlreadyStarted` once a cycle has run.
    pub const fn seed_pc(&mut self, index: usize) -> Result<(), SimError> {
        if self.cycle > 0 {
            return Err(SimError::AlreadyStarted);
        }
        self.pc = ProgramCounter::at(index);
        Ok(())
    }

    /// Whether the run is over: nothing left to fetch and nothing in flight.
    pub fn is_drained(&self) -> bool {
        self.latches
            .iter()
            .chain(self.bypass.iter())
            .all(PipelineLatch::is_empty)
            && self.latches.first().is_none_or(|l| !l.is_working())
    }

    /// Advances the pipeline by one clock cycle.
    ///
    /// # Errors
    ///
    /// The oldest program fault or engine defect raised this cycle. The cycle is
    /// not committed; architectural state keeps every effect of older
    /// instructions that completed before the fault.
    pub fn tick(&mut self, cpu: &mut Cpu) -> Result<StepStatus, SimError> {
        self.cycle += 1;
        let cycle = self.cycle;
        cpu.stats.cycles = cycle;
        self.pc.begin_cycle();

        let network = BypassNetwork::capture(self.latches.iter().chain(self.bypass.iter()));
        let d = self.layout.decode_index();
        let e = self.layout.execute_index();
        let m = self.layout.memory_index();
        let w = self.layout.writeback_index();
        let mut faults: Vec<(u64, SimError)> = Vec::new();

        // WriteBack.
        let wb_inputs = [
            self.latches[w - 1].current(),
            self.bypass.as_ref().and_then(Latch::current),
        ];
        if let Err(err) = stages::wb_stage(cpu, &wb_inputs, cycle) {
            faults.push((0, err));
        }

        // Decode.
        let input = self.latches[d - 1].current().copied();
        let older_in_flight = self.latches[d..e - 1].iter().any(|l| !l.is_empty());
        let mut ctx = IssueContext {
            layout: &self.layout,
            forwarding: self.forwarding,
            tracker: &mut self.tracker,
            ports: &mut self.ports,
            network: &network,
            cycle,
            seq: self.next_seq,
            older_in_flight,
        };
        let out = stages::decode_stage(cpu, input.as_ref(), &mut ctx).unwrap_or_else(|fault| {
            faults.push((self.next_seq, fault.into()));
            DecodeOutput::default()
        });
        if out.consumed() {
            self.next_seq += 1;
        }
        if let Some(slot) = out.issued {
            self.latches[d].push(slot);
        }
        let signals = out.signals;

        // Upstream relays and Fetch.
        if !signals.holds_front_end() {
            for i in 1..d {
                let relayed =
                    stages::relay_stage(self.layout.name(i), self.latches[i - 1].current(), &network);
                if let Some(slot) = relayed {
                    self.latches[i].push(slot);
                }
            }
            if let Some(slot) = stages::fetch_stage(cpu, &mut self.pc) {
                self.latches[0].push(slot);
            }
        }

        // Execute.
        let ex_seq = self.latches[e - 1].current().map_or(0, |s| s.seq);
        let executed = stages::execute_stage(
            &cpu.state.memory,
            &mut self.tracker,
            self.latches[e - 1].current(),
            &network,
            cycle,
        );
        match executed {
            Ok(Some(slot)) => self.route_execute(slot, e),
            Ok(None) => {}
            Err(err) => faults.push((ex_seq, err)),
        }

        // Downstream relays.
        for i in d + 1..w {
            if self.layout.stages()[i].kind != StageKind::Relay {
                continue;
            }
            let relayed =
                stages::relay_stage(self.layout.name(i), self.latches[i - 1].current(), &network);
            if let Some(slot) = relayed {
                self.latches[i].push(slot);
            }
        }

        // Memory.
        let mem_seq = self.latches[m - 1].current().map_or(0, |s| s.seq);
        let accessed = stages::mem_stage(
            &mut cpu.state.memory,
            &mut self.tracker,
            self.latches[m - 1].current(),
            &network,
            cycle,
        );
        match accessed {
            Ok(Some(slot)) => self.latches[m].push(slot),
            Ok(None) => {}
            Err(err) => faults.push((mem_seq, err)),
        }

        if let Some((_, err)) = faults.into_iter().min_by_key(|(seq, _)| *seq) {
            warn!(cycle, error = %err, "simulation stopped");
            return Err(err);
        }

        self.commit(cpu, signals);
        debug!(
            cycle,
            pc = self.pc.current,
            stall = ?signals.stall,
            redirect = ?signals.redirect,
            "cycle committed"
        );

        Ok(if self.is_drained() {
            StepStatus::Drained
        } else {
            StepStatus::Running
        })
    }

    /// Places Execute's output: ALU results take the bypass when there is one.
    fn route_execute(&mut self, slot: Slot<Packet>, execute: usize) {
        match (&mut self.bypass, slot.payload) {
            (Some(bypass), Packet::Executed(ExMemEntry::Alu { .. })) => bypass.push(slot),
            _ => self.latches[execute].push(slot),
        }
    }

    /// End-of-cycle update.
    fn commit(&mut self, cpu: &mut Cpu, signals: CycleSignals) {
        let d = self.layout.decode_index();

        if let Some(redirect) = signals.redirect {
            let flushed = self.latches[..d - 1]
                .iter()
                .filter(|l| !l.is_empty())
                .count();
            cpu.stats.flushed += flushed as u64;
            for latch in &mut self.latches[..d] {
                latch.flush();
            }
            self.pc.next = redirect.target;
            trace!(next_pc = redirect.target, flushed, "redirect");
        } else if signals.stall.is_some() {
            for latch in &mut self.latches[..d] {
                latch.hold();
            }
        }

        let execute_input_working = self.latches[self.layout.execute_index() - 1].is_working();
        let mut upstream = self.pc.next < cpu.program.len();
        for latch in &mut self.latches {
            let own = latch.is_working();
            latch.set_next_working(upstream);
            upstream = own;
        }
        if let Some(bypass) = &mut self.bypass {
            bypass.set_next_working(execute_input_working);
            bypass.commit();
        }
        for latch in &mut self.latches {
            latch.commit();
        }

        self.pc.commit();
        self.tracker.age();
        self.ports.release_through(self.cycle);
    }
}
