//! Stage graph.
//!
//! A [`PipelineLayout`] is an ordered list of stages with one latch between
//! each adjacent pair. Both supported topologies are instances of it; the
//! engine derives every timing constant (forwarding availability, write-back
//! distance, control bubble length) from stage positions relative to Decode.

use thiserror::Error;

use super::hazards::ProducerClass;
use crate::config::Layout;

/// What a stage does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Reads the instruction store at the program counter.
    Fetch,
    /// Hazard detection, operand read, branch resolution.
    Decode,
    /// ALU operation or effective-address calculation.
    Execute,
    /// Data memory access.
    Memory,
    /// Register file update.
    WriteBack,
    /// Carries its packet forward one stage, resolving forwarded operands on the way.
    Relay,
}

/// One stage of a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageSlot {
    /// Behaviour of the stage.
    pub kind: StageKind,
    /// Short name used in traces (`IF`, `ID1`, `DM0`, ...).
    pub name: &'static str,
}

impl StageSlot {
    /// Creates a stage slot.
    pub const fn new(kind: StageKind, name: &'static str) -> Self {
        Self { kind, name }
    }
}

/// Reasons a stage list cannot form a pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A required stage kind is absent or appears more than once.
    #[error("layout must contain exactly one {0:?} stage")]
    StageCount(StageKind),
    /// Required stages are not in Fetch, Decode, Execute, Memory, WriteBack order.
    #[error("stages must be ordered Fetch < Decode < Execute < Memory < WriteBack, with Fetch first and WriteBack last")]
    Order,
}

/// Validated stage graph with precomputed distances.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineLayout {
    stages: Vec<StageSlot>,
    decode: usize,
    execute: usize,
    memory: usize,
    writeback: usize,
    alu_bypass: bool,
}

impl PipelineLayout {
    /// Builds a layout from an ordered stage list.
    ///
    /// With `alu_bypass`, ALU results travel from Execute straight to WriteBack
    /// through a dedicated latch instead of passing through the memory stages.
    pub fn new(stages: Vec<StageSlot>, alu_bypass: bool) -> Result<Self, LayoutError> {
        let find = |kind: StageKind| {
            let mut hits = stages
                .iter()
                .enumerate()
                .filter(|(_, s)| s.kind == kind)
                .map(|(i, _)| i);
            match (hits.next(), hits.next()) {
                (Some(idx), None) => Ok(idx),
                _ => Err(LayoutError::StageCount(kind)),
            }
        };
        let fetch = find(StageKind::Fetch)?;
        let decode = find(StageKind::Decode)?;
        let execute = find(StageKind::Execute)?;
        let memory = find(StageKind::Memory)?;
        let writeback = find(StageKind::WriteBack)?;

        let ordered = fetch == 0
            && fetch < decode
            && decode < execute
            && execute < memory
            && memory < writeback
            && writeback == stages.len() - 1;
        if !ordered {
            return Err(LayoutError::Order);
        }

        Ok(Self {
            stages,
            decode,
            execute,
            memory,
            writeback,
            alu_bypass,
        })
    }

    /// `IF ID EX MEM WB`.
    pub fn classic() -> Self {
        Self {
            stages: vec![
                StageSlot::new(StageKind::Fetch, "IF"),
                StageSlot::new(StageKind::Decode, "ID"),
                StageSlot::new(StageKind::Execute, "EX"),
                StageSlot::new(StageKind::Memory, "MEM"),
                StageSlot::new(StageKind::WriteBack, "WB"),
            ],
            decode: 1,
            execute: 2,
            memory: 3,
            writeback: 4,
            alu_bypass: false,
        }
    }

    /// `IF0 IF1 ID0 ID1 RR EX DM0 DM1 WB`, ALU results bypassing `DM0`/`DM1`.
    pub fn split() -> Self {
        Self {
            stages: vec![
                StageSlot::new(StageKind::Fetch, "IF0"),
                StageSlot::new(StageKind::Relay, "IF1"),
                StageSlot::new(StageKind::Relay, "ID0"),
                StageSlot::new(StageKind::Decode, "ID1"),
                StageSlot::new(StageKind::Relay, "RR"),
                StageSlot::new(StageKind::Execute, "EX"),
                StageSlot::new(StageKind::Relay, "DM0"),
                StageSlot::new(StageKind::Memory, "DM1"),
                StageSlot::new(StageKind::WriteBack, "WB"),
            ],
            decode: 3,
            execute: 5,
            memory: 7,
            writeback: 8,
            alu_bypass: true,
        }
    }

    /// Layout for a configuration choice.
    pub fn from_config(layout: Layout) -> Self {
        match layout {
            Layout::Classic => Self::classic(),
            Layout::Split => Self::split(),
        }
    }

    /// All stages, Fetch first.
    pub fn stages(&self) -> &[StageSlot] {
        &self.stages
    }

    /// Number of stages.
    pub fn depth(&self) -> usize {
        self.stages.len()
    }

    /// Name of the stage at `idx`.
    pub fn name(&self, idx: usize) -> &'static str {
        self.stages.get(idx).map_or("?", |s| s.name)
    }

    /// Index of the Decode stage. Also the control bubble length in cycles.
    pub const fn decode_index(&self) -> usize {
        self.decode
    }

    /// Index of the Execute stage.
    pub const fn execute_index(&self) -> usize {
        self.execute
    }

    /// Index of the Memory stage.
    pub const fn memory_index(&self) -> usize {
        self.memory
    }

    /// Index of the WriteBack stage.
    pub const fn writeback_index(&self) -> usize {
        self.writeback
    }

    /// Whether ALU results skip the memory stages.
    pub const fn alu_bypass(&self) -> bool {
        self.alu_bypass
    }

    /// Cycles from Decode to Execute.
    pub const fn ex_distance(&self) -> usize {
        self.execute - self.decode
    }

    /// Cycles from Decode to Memory.
    pub const fn mem_distance(&self) -> usize {
        self.memory - self.decode
    }

    /// Cycles after issue at which a producer of `class` computes its result.
    pub const fn available_after(&self, class: ProducerClass) -> usize {
        match class {
            ProducerClass::Alu => self.ex_distance(),
            ProducerClass::Load => self.mem_distance(),
        }
    }

    /// Cycles after issue at which a producer of `class` writes the register file.
    pub const fn writeback_after(&self, class: ProducerClass) -> usize {
        match class {
            ProducerClass::Alu if self.alu_bypass => self.ex_distance() + 1,
            ProducerClass::Alu | ProducerClass::Load => self.writeback - self.decode,
        }
    }

    /// Pipeline length seen by an instruction of `class`, Fetch to WriteBack inclusive.
    pub const fn path_length(&self, class: ProducerClass) -> usize {
        self.decode + self.writeback_after(class) + 1
    }
}
