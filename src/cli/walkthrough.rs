//! Step-through front-end for the single-step driver.
//!
//! Interactive mode reads one command per line: Enter steps, `r` starts over, `q` quits.
//! Automatic mode steps on a timer until the run ends.

use std::io::{self, BufRead};
use std::thread;
use std::time::Duration;

use termcolor::WriteColor;

use super::output;
use crate::engine::{RunState, StepConfig, StepDriver, StepReport};
use crate::model::Pda;

const HELP: &str = "\
Commands:
  <Enter>, s   take one step
  r            reset to the initial configuration
  q, :quit     leave the walkthrough
  :help        show this help";

/// A driver plus the step budget it runs under.
pub struct Walkthrough<'a> {
    driver: StepDriver<'a>,
    config: StepConfig,
}

enum Action {
    Step,
    Reset,
    Help,
    Quit,
    Unknown,
}

fn parse_action(line: &str) -> Action {
    match line.trim() {
        "" | "s" => Action::Step,
        "r" => Action::Reset,
        ":help" | "h" | "?" => Action::Help,
        "q" | ":quit" => Action::Quit,
        _ => Action::Unknown,
    }
}

impl<'a> Walkthrough<'a> {
    pub fn new(pda: &'a Pda, input: &str, config: StepConfig) -> Self {
        Self {
            driver: StepDriver::new(pda, input),
            config,
        }
    }

    pub fn run_state(&self) -> &RunState {
        self.driver.run_state()
    }

    pub fn into_run_state(self) -> RunState {
        self.driver.into_run_state()
    }

    /// One step, or a rejection once the budget is spent.
    pub fn advance(&mut self) -> StepReport {
        let run = self.driver.run_state();
        if !run.is_finished() && run.steps >= self.config.max_steps {
            self.driver.halt();
            return StepReport {
                continues: false,
                message: format!("step budget of {} exhausted", self.config.max_steps),
            };
        }
        self.driver.step()
    }

    /// Reads commands from `input` until the user quits or input ends.
    pub fn interactive<R: BufRead, W: WriteColor>(
        &mut self,
        mut input: R,
        out: &mut W,
    ) -> io::Result<()> {
        writeln!(out, "--- Start ---")?;
        output::print_run_state(out, self.run_state())?;
        writeln!(out, "Press Enter to step, r to reset, q to quit, :help for help")?;

        let mut line = String::new();
        loop {
            write!(out, "step> ")?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(());
            }
            match parse_action(&line) {
                Action::Step => {
                    let report = self.advance();
                    output::print_step(out, self.run_state(), &report)?;
                }
                Action::Reset => {
                    self.driver.reset();
                    writeln!(out, "--- Reset ---")?;
                    output::print_run_state(out, self.run_state())?;
                }
                Action::Help => writeln!(out, "{HELP}")?,
                Action::Quit => return Ok(()),
                Action::Unknown => {
                    writeln!(out, "Unknown command '{}'. Type :help for help.", line.trim())?
                }
            }
        }
    }

    /// Steps every `delay` until the run reaches a terminal state.
    pub fn automatic<W: WriteColor>(&mut self, delay: Duration, out: &mut W) -> io::Result<()> {
        writeln!(out, "--- Start ---")?;
        output::print_run_state(out, self.run_state())?;
        loop {
            out.flush()?;
            thread::sleep(delay);
            let report = self.advance();
            output::print_step(out, self.run_state(), &report)?;
            if !report.continues {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RunStatus;
    use std::io::Cursor;
    use termcolor::Buffer;

    #[test]
    fn test_interactive_session_steps_to_acceptance() {
        let pda = crate::presets::compile("anbn").unwrap();
        let mut walk = Walkthrough::new(&pda, "ab", StepConfig::default());
        let mut out = Buffer::no_color();
        walk.interactive(Cursor::new("\n\ns\n\nq\n"), &mut out).unwrap();

        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("--- Step 1: Transitioned to q0 ---"));
        assert!(text.contains("Accepted!"));
        assert!(text.contains("Simulation is already finished."));
        assert_eq!(walk.run_state().status, RunStatus::Accepted);
    }

    #[test]
    fn test_reset_and_unknown_commands() {
        let pda = crate::presets::compile("anbn").unwrap();
        let mut walk = Walkthrough::new(&pda, "ab", StepConfig::default());
        let mut out = Buffer::no_color();
        walk.interactive(Cursor::new("\nr\nxyz\n"), &mut out).unwrap();

        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("--- Reset ---"));
        assert!(text.contains("Unknown command 'xyz'"));
        assert_eq!(walk.run_state().steps, 0);
    }

    #[test]
    fn test_automatic_mode_respects_budget() {
        let pda = crate::model::PdaBuilder::new()
            .states(["q"])
            .start("q")
            .rule("q,ε,ε -> q,A")
            .compile()
            .unwrap();
        let mut walk = Walkthrough::new(&pda, "", StepConfig::default().with_max_steps(3));
        let mut out = Buffer::no_color();
        walk.automatic(Duration::ZERO, &mut out).unwrap();

        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("step budget of 3 exhausted"));
        assert_eq!(walk.into_run_state().status, RunStatus::Rejected);
    }
}
