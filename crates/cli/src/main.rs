//! Pipeline simulator CLI.
//!
//! This binary is the single entry point for running assembly programs. It performs:
//! 1. **Pipelined run:** Simulate a program cycle by cycle on the classic or split layout,
//!    with or without forwarding, optionally dumping registers after every cycle.
//! 2. **Reference run:** Execute the same program on the sequential interpreter, one
//!    instruction per cycle, for comparing final state.
//!
//! Both modes finish with the exit report and exit with the error class code.

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::{fs, process};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pipesim_core::common::SimError;
use pipesim_core::config::{Config, Layout};
use pipesim_core::core::arch::RegisterFile;
use pipesim_core::sim::loader::{self, LoadError};
use pipesim_core::sim::reference::Interpreter;
use pipesim_core::sim::report::ExitReport;
use pipesim_core::stats::STATS_SECTIONS;
use pipesim_core::{Program, Simulator};

/// Exit status when the input file or configuration cannot be read (`EX_NOINPUT`).
const EXIT_NO_INPUT: i32 = 66;

#[derive(Parser, Debug)]
#[command(
    name = "pipesim",
    author,
    version,
    about = "Cycle-level pipelined MIPS-like processor simulator",
    long_about = "Run an assembly program through the pipeline or the sequential reference interpreter.\n\nExamples:\n  pipesim run prog.asm\n  pipesim run prog.asm --layout split --forwarding --stats\n  pipesim run prog.asm --stats-sections summary,hazards\n  pipesim run prog.asm --print-registers\n  pipesim reference prog.asm"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program on the pipeline.
    Run {
        /// Assembly source file.
        file: PathBuf,

        /// Stage layout (overrides the configuration file).
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,

        /// Enable forwarding (overrides the configuration file).
        #[arg(long)]
        forwarding: bool,

        /// JSON configuration file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the cycle number and all 32 registers after every cycle.
        #[arg(long)]
        print_registers: bool,

        /// Stop after this many cycles.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Log every stage's activity to stderr.
        #[arg(long)]
        trace: bool,

        /// Print pipeline statistics after the report.
        #[arg(long)]
        stats: bool,

        /// Print only these statistics sections (implies `--stats`).
        #[arg(
            long,
            value_delimiter = ',',
            value_parser = PossibleValuesParser::new(STATS_SECTIONS.iter().copied())
        )]
        stats_sections: Vec<String>,
    },

    /// Run a program on the sequential reference interpreter.
    Reference {
        /// Assembly source file.
        file: PathBuf,

        /// Log interpreter activity to stderr.
        #[arg(long)]
        trace: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    Classic,
    Split,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Classic => Self::Classic,
            LayoutArg::Split => Self::Split,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            layout,
            forwarding,
            config,
            print_registers,
            max_cycles,
            trace,
            stats,
            stats_sections,
        } => {
            init_tracing(trace);
            let mut config = config.as_deref().map_or_else(Config::default, load_config);
            if let Some(layout) = layout {
                config.pipeline.layout = layout.into();
            }
            config.pipeline.forwarding |= forwarding;
            config.general.print_registers |= print_registers;
            if max_cycles.is_some() {
                config.general.max_cycles = max_cycles;
            }
            let sections = (stats || !stats_sections.is_empty()).then_some(stats_sections);
            cmd_run(&file, &config, sections.as_deref());
        }
        Commands::Reference { file, trace } => {
            init_tracing(trace);
            cmd_reference(&file);
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `--trace`.
fn init_tracing(trace: bool) {
    let default = if trace { "pipesim_core=trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: &Path) -> Config {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config {}: {}", path.display(), e);
        process::exit(EXIT_NO_INPUT);
    });
    Config::from_json(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing config {}: {}", path.display(), e);
        process::exit(EXIT_NO_INPUT);
    })
}

/// Loads a program, exiting with the error's status if it is rejected.
fn load_program(path: &Path) -> Program {
    match loader::load_file(path) {
        Ok(program) => program,
        Err(LoadError::Program(err)) => {
            eprintln!("{}", err.class_message());
            eprintln!("{err}");
            process::exit(err.exit_code());
        }
        Err(err @ LoadError::Io { .. }) => {
            eprintln!("Error: {err}");
            process::exit(EXIT_NO_INPUT);
        }
    }
}

/// Runs the pipeline to completion, prints the report and exits with its status.
fn cmd_run(path: &Path, config: &Config, stats: Option<&[String]>) {
    let program = load_program(path);
    debug!(file = %path.display(), instructions = program.len(), ?config, "loaded");
    let mut sim = Simulator::new(program, config);

    let summary = if config.general.print_registers {
        sim.run_with(&mut |cycle: u64, regs: &RegisterFile| {
            println!("Cycle number: {cycle}");
            println!("{regs}");
        })
    } else {
        sim.run()
    };

    let report = ExitReport::for_pipeline(&sim, &summary);
    finish(&report);
    if let Some(sections) = stats {
        sim.stats().print_sections(sections);
    }
    process::exit(report.exit_code());
}

/// Runs the reference interpreter, prints the report and exits with its status.
fn cmd_reference(path: &Path) {
    let program = load_program(path);
    let mut interp = Interpreter::new(program);
    let error = interp.run().err().map(SimError::Program);

    let report = ExitReport::for_reference(&interp, error.as_ref());
    finish(&report);
    process::exit(report.exit_code());
}

/// Error section to stderr, report body to stdout.
fn finish(report: &ExitReport<'_>) {
    if let Some(section) = report.error_section() {
        eprint!("{section}");
    }
    print!("{report}");
}
