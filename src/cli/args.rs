//! Command-line arguments and subcommands for `pushdown`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::trace::RecordingPolicy;

#[derive(Debug, Parser)]
#[command(
    name = "pushdown",
    version,
    about = "Simulate nondeterministic pushdown automata."
)]
pub struct PushdownArgs {
    /// Raise the log level (-v debug, -vv trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the automaton comes from: a definition file or a built-in preset.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// YAML or JSON definition file.
    #[arg(short, long, value_name = "FILE")]
    pub definition: Option<PathBuf>,

    /// Built-in sample PDA (see `pushdown presets`).
    #[arg(short, long, value_name = "NAME")]
    pub preset: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TraceMode {
    /// Verdicts only.
    None,
    /// The accepting path.
    Path,
    /// Every explored configuration, abandoned branches included.
    All,
}

impl TraceMode {
    pub fn recording(self) -> RecordingPolicy {
        match self {
            TraceMode::None => RecordingPolicy::Off,
            TraceMode::Path => RecordingPolicy::AcceptingPath,
            TraceMode::All => RecordingPolicy::Exhaustive,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decide acceptance with the backtracking search engine.
    Run {
        #[command(flatten)]
        source: SourceArgs,

        /// Input strings; pass "" for the empty word.
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Recursion depth bound.
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,

        /// Cut branches whose configuration already occurs on their own path.
        #[arg(long)]
        prune_repeats: bool,

        /// Trace to print under each verdict.
        #[arg(long, value_enum)]
        trace: Option<TraceMode>,

        /// Emit machine-readable outcomes.
        #[arg(long)]
        json: bool,
    },
    /// Walk one input through the single-step driver.
    Step {
        #[command(flatten)]
        source: SourceArgs,

        /// Input string; omit for the empty word.
        #[arg(default_value = "")]
        input: String,

        /// Step on a timer instead of waiting for Enter.
        #[arg(long)]
        auto: bool,

        /// Pause between automatic steps.
        #[arg(long, value_name = "MS", default_value_t = 500)]
        delay_ms: u64,

        /// Moves allowed before the run is abandoned.
        #[arg(long, value_name = "N")]
        max_steps: Option<usize>,
    },
    /// Run both engines on each input and flag disagreements.
    Compare {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(required = true)]
        inputs: Vec<String>,

        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,
    },
    /// Lint a definition file, or every definition file under a directory.
    Check {
        #[arg(required = true)]
        path: PathBuf,
    },
    /// List the built-in sample PDAs.
    Presets,
}
