//! The `pushdown` command-line interface.
//!
//! Entry point for all subcommands. Each handler loads the automaton, hands it to the
//! library, and leaves rendering to [`output`].

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::cli::args::{Command, PushdownArgs, SourceArgs, TraceMode};
use crate::engine::{compare, CyclePolicy, SearchEngine, StepExecutor};
use crate::errors::{print_error, ErrorKind, PdaError};
use crate::model::Pda;
use crate::syntax::{load_definition, Settings};
use crate::{presets, validate};

pub mod args;
pub mod output;
pub mod walkthrough;

/// The main entry point for the CLI.
pub fn run() {
    let args = PushdownArgs::parse();
    init_logging(args.verbose);

    if let Err(e) = dispatch(args.command) {
        print_error(e);
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "pushdown=debug",
        _ => "pushdown=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn dispatch(command: Command) -> Result<(), PdaError> {
    match command {
        Command::Run {
            source,
            inputs,
            max_depth,
            prune_repeats,
            trace,
            json,
        } => handle_run(&source, &inputs, max_depth, prune_repeats, trace, json),
        Command::Step {
            source,
            input,
            auto,
            delay_ms,
            max_steps,
        } => handle_step(&source, &input, auto, delay_ms, max_steps),
        Command::Compare {
            source,
            inputs,
            max_depth,
        } => handle_compare(&source, &inputs, max_depth),
        Command::Check { path } => handle_check(&path),
        Command::Presets => {
            let mut stdout = StandardStream::stdout(ColorChoice::Auto);
            output::print_presets(&mut stdout, presets::all()).map_err(write_failed)
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// A compiled automaton and the settings its definition file carried.
struct Loaded {
    pda: Pda,
    settings: Settings,
}

fn load(source: &SourceArgs) -> Result<Loaded, PdaError> {
    match (&source.definition, &source.preset) {
        (Some(path), _) => {
            let loaded = load_definition(path)?;
            tracing::info!(name = %loaded.name, "loaded definition");
            Ok(Loaded {
                pda: Pda::new(loaded.definition)?,
                settings: loaded.settings,
            })
        }
        (None, Some(name)) => Ok(Loaded {
            pda: presets::compile(name)?,
            settings: Settings::default(),
        }),
        // clap's argument group requires one of the two.
        (None, None) => Err(PdaError::unsourced(
            ErrorKind::UndefinedPda {
                reason: "no definition file or preset given".into(),
            },
            "cli",
        )
        .with_help("pass --definition FILE or --preset NAME")),
    }
}

fn write_failed(error: io::Error) -> PdaError {
    PdaError::unsourced(
        ErrorKind::Io {
            operation: "write".into(),
            path: "stdout".into(),
            reason: error.to_string(),
        },
        "cli",
    )
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn handle_run(
    source: &SourceArgs,
    inputs: &[String],
    max_depth: Option<usize>,
    prune_repeats: bool,
    trace: Option<TraceMode>,
    json: bool,
) -> Result<(), PdaError> {
    let loaded = load(source)?;
    let mut config = loaded.settings.search_config();
    if let Some(max_depth) = max_depth {
        config = config.with_max_depth(max_depth);
    }
    if prune_repeats {
        config = config.with_cycle_policy(CyclePolicy::PruneRepeats);
    }
    // Without an explicit choice, plain output shows verdicts only; JSON keeps the file's policy.
    match trace {
        Some(mode) => config = config.with_recording(mode.recording()),
        None if !json && loaded.settings.recording.is_none() => {
            config = config.with_recording(TraceMode::None.recording())
        }
        None => {}
    }

    let engine = SearchEngine::new(config);
    let outcomes: Vec<_> = inputs
        .iter()
        .map(|input| engine.run(&loaded.pda, input))
        .collect();

    if json {
        return output::print_json(&mut io::stdout(), &outcomes).map_err(write_failed);
    }
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for outcome in &outcomes {
        output::print_outcome(&mut stdout, outcome).map_err(write_failed)?;
    }
    Ok(())
}

fn handle_step(
    source: &SourceArgs,
    input: &str,
    auto: bool,
    delay_ms: u64,
    max_steps: Option<usize>,
) -> Result<(), PdaError> {
    let loaded = load(source)?;
    let mut config = loaded.settings.step_config();
    if let Some(max_steps) = max_steps {
        config = config.with_max_steps(max_steps);
    }

    let mut walk = walkthrough::Walkthrough::new(&loaded.pda, input, config);
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let result = if auto {
        walk.automatic(Duration::from_millis(delay_ms), &mut stdout)
    } else {
        walk.interactive(io::stdin().lock(), &mut stdout)
    };
    result.map_err(write_failed)?;
    stdout.flush().map_err(write_failed)
}

fn handle_compare(
    source: &SourceArgs,
    inputs: &[String],
    max_depth: Option<usize>,
) -> Result<(), PdaError> {
    let loaded = load(source)?;
    let mut search_config = loaded
        .settings
        .search_config()
        .with_recording(TraceMode::None.recording());
    if let Some(max_depth) = max_depth {
        search_config = search_config.with_max_depth(max_depth);
    }
    let search = SearchEngine::new(search_config);
    let stepper = StepExecutor::new(loaded.settings.step_config());

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut diverging = 0;
    for input in inputs {
        let comparison = compare(&loaded.pda, input, &search, &stepper);
        if comparison.diverges() {
            diverging += 1;
        }
        output::print_comparison(&mut stdout, &comparison).map_err(write_failed)?;
    }
    writeln!(stdout, "{diverging} of {} input(s) diverge", inputs.len()).map_err(write_failed)
}

/// Definition files under `path`, or `path` itself when it is a file.
fn definition_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    let mut files: Vec<_> = WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| {
            matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("yaml" | "yml" | "json")
            )
        })
        .collect();
    files.sort();
    files
}

fn handle_check(path: &Path) -> Result<(), PdaError> {
    if !path.exists() {
        return Err(PdaError::unsourced(
            ErrorKind::Io {
                operation: "check".into(),
                path: path.display().to_string(),
                reason: "no such file or directory".into(),
            },
            "cli",
        ));
    }

    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut failed = 0;
    let files = definition_files(path);
    for file in &files {
        let name = file.display().to_string();
        let findings = match load_definition(file) {
            Ok(loaded) => validate::lint(&loaded.definition),
            Err(error) => vec![error],
        };
        if validate::has_errors(&findings) {
            failed += 1;
        }
        output::print_findings(&mut stdout, &name, findings).map_err(write_failed)?;
    }
    tracing::debug!(files = files.len(), failed, "check finished");

    if failed > 0 {
        stdout.flush().map_err(write_failed)?;
        process::exit(1);
    }
    Ok(())
}
