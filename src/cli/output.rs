//! User-facing output for the CLI.
//!
//! Everything writes to a [`WriteColor`] so commands print in color to a terminal and tests
//! can render into a plain [`termcolor::Buffer`].

use serde::Serialize;
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};
use unicode_width::UnicodeWidthStr;

use crate::engine::{Comparison, Outcome, RunState, RunStatus, StepReport, Verdict};
use crate::errors::PdaError;
use crate::model::{Stack, Symbol};
use crate::presets::PresetInfo;
use crate::trace::{EntryKind, Trace};

// ============================================================================
// VERDICTS AND TRACES
// ============================================================================

fn verdict_color(verdict: Verdict) -> Color {
    match verdict {
        Verdict::Accepted => Color::Green,
        Verdict::Rejected => Color::Red,
    }
}

fn write_verdict<W: WriteColor>(out: &mut W, verdict: Verdict) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(verdict_color(verdict))).set_bold(true))?;
    write!(out, "{verdict}")?;
    out.reset()
}

/// Shows the empty word as `ε` so it stays visible.
fn display_input(input: &str) -> &str {
    if input.is_empty() {
        crate::model::EPSILON
    } else {
        input
    }
}

pub fn print_outcome<W: WriteColor>(out: &mut W, outcome: &Outcome) -> io::Result<()> {
    write!(out, "{:<12} ", display_input(&outcome.input))?;
    write_verdict(out, outcome.verdict)?;
    writeln!(out)?;
    if let Some(message) = &outcome.message {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(out, "  note: {message}")?;
        out.reset()?;
    }
    if !outcome.trace.is_empty() {
        print_trace(out, &outcome.trace)?;
    }
    Ok(())
}

pub fn print_trace<W: WriteColor>(out: &mut W, trace: &Trace) -> io::Result<()> {
    for (i, entry) in trace.iter().enumerate() {
        let indent = "  ".repeat(entry.depth.min(20));
        if entry.kind == EntryKind::Accept {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        }
        writeln!(out, "  {i:>3}. {indent}{entry}")?;
        out.reset()?;
    }
    Ok(())
}

// ============================================================================
// TAPE AND STACK
// ============================================================================

/// The input as space-separated cells, and a caret line pointing at `cursor`.
///
/// Cell widths follow terminal display width, so wide symbols keep the caret aligned.
pub fn render_tape(input: &[Symbol], cursor: usize) -> (String, String) {
    if input.is_empty() {
        return (crate::model::EPSILON.to_string(), "^".to_string());
    }
    let tape = input
        .iter()
        .map(Symbol::as_str)
        .collect::<Vec<_>>()
        .join(" ");
    let column: usize = input
        .iter()
        .take(cursor)
        .map(|s| UnicodeWidthStr::width(s.as_str()) + 1)
        .sum();
    (tape, format!("{}^", " ".repeat(column)))
}

/// Top-first, one cell per symbol: `| A | Z |`.
pub fn render_stack(stack: &Stack) -> String {
    if stack.is_empty() {
        return "(empty)".to_string();
    }
    let cells: Vec<_> = stack.iter().rev().map(|s| format!(" {s} ")).collect();
    format!("|{}|", cells.join("|"))
}

pub fn print_run_state<W: WriteColor>(out: &mut W, run: &RunState) -> io::Result<()> {
    let (tape, caret) = render_tape(&run.input, run.configuration.cursor);
    writeln!(out, "  tape:  {tape}")?;
    writeln!(out, "         {caret}")?;
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "  state: {}", run.configuration.state)?;
    out.reset()?;
    writeln!(out, "  stack: {}", render_stack(&run.configuration.stack))?;
    if let Some(entry) = run.history.last() {
        if let Some(operation) = &entry.operation {
            writeln!(out, "  last:  {operation}")?;
        }
    }
    Ok(())
}

pub fn print_step<W: WriteColor>(out: &mut W, run: &RunState, report: &StepReport) -> io::Result<()> {
    let color = match run.status {
        RunStatus::Running => Color::Cyan,
        RunStatus::Accepted => Color::Green,
        RunStatus::Rejected => Color::Red,
    };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    writeln!(out, "--- Step {}: {} ---", run.steps, report.message)?;
    out.reset()?;
    print_run_state(out, run)
}

// ============================================================================
// COMPARISON
// ============================================================================

pub fn print_comparison<W: WriteColor>(out: &mut W, comparison: &Comparison) -> io::Result<()> {
    write!(out, "{:<12} search: ", display_input(&comparison.input))?;
    write_verdict(out, comparison.search.verdict)?;
    write!(out, "  stepper: ")?;
    write_verdict(out, comparison.stepper.verdict)?;
    if comparison.diverges() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        write!(out, "  DIVERGES")?;
        out.reset()?;
    }
    writeln!(out)?;
    if comparison.diverges() {
        if let Some(message) = &comparison.stepper.message {
            writeln!(out, "  stepper stopped: {message}")?;
        }
    }
    Ok(())
}

// ============================================================================
// LINT FINDINGS, PRESETS, JSON
// ============================================================================

pub fn print_findings<W: WriteColor>(
    out: &mut W,
    name: &str,
    findings: Vec<PdaError>,
) -> io::Result<()> {
    if findings.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(out, "{name}: ok")?;
        return out.reset();
    }
    let (errors, warnings) = findings.iter().fold((0, 0), |(e, w), f| {
        if f.is_warning() {
            (e, w + 1)
        } else {
            (e + 1, w)
        }
    });
    let color = if errors > 0 { Color::Red } else { Color::Yellow };
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    writeln!(out, "{name}: {errors} error(s), {warnings} warning(s)")?;
    out.reset()?;
    for finding in findings {
        writeln!(out, "{:?}", miette::Report::new(finding))?;
    }
    Ok(())
}

pub fn print_presets<W: WriteColor>(out: &mut W, presets: &[PresetInfo]) -> io::Result<()> {
    for preset in presets {
        out.set_color(ColorSpec::new().set_bold(true))?;
        write!(out, "{:<18}", preset.name)?;
        out.reset()?;
        writeln!(out, "{}", preset.description)?;
        let samples: Vec<_> = preset
            .samples
            .iter()
            .map(|s| format!("\"{s}\""))
            .collect();
        writeln!(out, "{:<18}try: {}", "", samples.join(" "))?;
    }
    Ok(())
}

pub fn print_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{tokenize, StackSymbol};
    use termcolor::Buffer;

    fn rendered(write: impl FnOnce(&mut Buffer) -> io::Result<()>) -> String {
        let mut buffer = Buffer::no_color();
        write(&mut buffer).unwrap();
        String::from_utf8(buffer.into_inner()).unwrap()
    }

    #[test]
    fn test_tape_caret_follows_cursor() {
        let (tape, caret) = render_tape(&tokenize("aab"), 2);
        assert_eq!(tape, "a a b");
        assert_eq!(caret, "    ^");
    }

    #[test]
    fn test_tape_caret_handles_wide_symbols() {
        let (tape, caret) = render_tape(&tokenize("日本"), 1);
        assert_eq!(tape, "日 本");
        assert_eq!(caret, "   ^");
    }

    #[test]
    fn test_stack_renders_top_first() {
        let stack = Stack::with_bottom(StackSymbol::from('Z'))
            .push_sequence(&StackSymbol::sequence("A"));
        assert_eq!(render_stack(&stack), "| A | Z |");
        assert_eq!(render_stack(&Stack::new()), "(empty)");
    }

    #[test]
    fn test_outcome_shows_empty_word_and_verdict() {
        let pda = crate::presets::compile("anbn").unwrap();
        let outcome = crate::engine::SearchEngine::default().run(&pda, "");
        let text = rendered(|out| print_outcome(out, &outcome));
        assert!(text.starts_with("ε"));
        assert!(text.contains("REJECTED"));
    }

    #[test]
    fn test_clean_findings_print_ok() {
        let text = rendered(|out| print_findings(out, "anbn.yaml", Vec::new()));
        assert_eq!(text, "anbn.yaml: ok\n");
    }
}
