//! Configuration system for the pipeline simulator.
//!
//! This module defines the configuration structures used to parameterize a run.
//! It provides:
//! 1. **Defaults:** Baseline settings (classic 5-stage layout, no forwarding).
//! 2. **Structures:** General run options and pipeline shape.
//! 3. **Enums:** The stage layouts the engine can be instantiated with.
//!
//! Configuration is supplied as JSON (`--config` on the CLI) or built with `Config::default()`.

use serde::{Deserialize, Serialize};

/// Default configuration constants for the simulator.
mod defaults {
    /// Forwarding is disabled by default; every hazard stalls until write-back.
    pub const FORWARDING: bool = false;

    /// Per-cycle register dumps are off by default.
    pub const PRINT_REGISTERS: bool = false;
}

/// Stage layouts supported by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `IF ID EX MEM WB`.
    #[default]
    Classic,
    /// `IF0 IF1 ID0 ID1 RR EX DM0 DM1 WB` with an ALU bypass from `EX` straight to `WB`.
    Split,
}

/// Root configuration structure.
///
/// Every field has a default, so an empty JSON object is a valid configuration.
///
/// # Example
///
/// ```
/// use pipesim_core::config::{Config, Layout};
///
/// let json = r#"{
///     "general": { "print_registers": true },
///     "pipeline": { "layout": "split", "forwarding": true }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.print_registers);
/// assert_eq!(config.pipeline.layout, Layout::Split);
/// assert!(config.pipeline.forwarding);
/// assert_eq!(config.general.max_cycles, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// General run settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Pipeline shape and hazard policy.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// General run settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Print `Cycle number: N` and all 32 registers after every cycle.
    #[serde(default = "GeneralConfig::default_print_registers")]
    pub print_registers: bool,

    /// Stop after this many cycles. The engine itself never times out; this is
    /// a safety valve for callers running untrusted programs.
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

impl GeneralConfig {
    const fn default_print_registers() -> bool {
        defaults::PRINT_REGISTERS
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            print_registers: defaults::PRINT_REGISTERS,
            max_cycles: None,
        }
    }
}

/// Pipeline shape and hazard policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Stage layout.
    #[serde(default)]
    pub layout: Layout,

    /// Forward results from Execute/Memory to dependent instructions instead of
    /// stalling until write-back.
    #[serde(default = "PipelineConfig::default_forwarding")]
    pub forwarding: bool,
}

impl PipelineConfig {
    const fn default_forwarding() -> bool {
        defaults::FORWARDING
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
            forwarding: defaults::FORWARDING,
        }
    }
}
