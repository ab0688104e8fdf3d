//! Single-step driver for walkthroughs.
//!
//! Each [`StepDriver::step`] call performs exactly one move: the first consuming candidate
//! if there is one, otherwise the first epsilon candidate. There is no backtracking, so a
//! run can end in `Rejected` on inputs the search engine accepts. That is expected.
//!
//! The whole run lives in [`RunState`], which serializes, so a front-end can park a run
//! between steps and resume it later with [`StepDriver::resume`].

use serde::{Deserialize, Serialize};

use super::{Executor, Outcome, RunStats, Verdict};
use crate::model::{tokenize, Configuration, Pda, Symbol};
use crate::trace::{RecordingPolicy, Trace, TraceEntry};

pub const DEFAULT_MAX_STEPS: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Accepted,
    Rejected,
}

impl RunStatus {
    pub fn is_terminal(self) -> bool {
        self != RunStatus::Running
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub input: Vec<Symbol>,
    pub configuration: Configuration,
    pub status: RunStatus,
    pub steps: usize,
    pub history: Vec<TraceEntry>,
}

impl RunState {
    pub fn new(pda: &Pda, input: &str) -> Self {
        let input = tokenize(input);
        let configuration = pda.initial_configuration();
        let history = vec![TraceEntry::initial(&configuration, &input)];
        Self {
            input,
            configuration,
            status: RunStatus::Running,
            steps: 0,
            history,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn input_exhausted(&self) -> bool {
        self.configuration.cursor >= self.input.len()
    }

    pub fn next_symbol(&self) -> Option<&Symbol> {
        self.input.get(self.configuration.cursor)
    }
}

/// Result of one `step` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Whether another step can follow.
    pub continues: bool,
    pub message: String,
}

impl StepReport {
    fn stop(message: impl Into<String>) -> Self {
        Self {
            continues: false,
            message: message.into(),
        }
    }
}

pub struct StepDriver<'a> {
    pda: &'a Pda,
    run: RunState,
}

impl<'a> StepDriver<'a> {
    pub fn new(pda: &'a Pda, input: &str) -> Self {
        Self {
            pda,
            run: RunState::new(pda, input),
        }
    }

    pub fn resume(pda: &'a Pda, run: RunState) -> Self {
        Self { pda, run }
    }

    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    pub fn into_run_state(self) -> RunState {
        self.run
    }

    pub fn status(&self) -> RunStatus {
        self.run.status
    }

    /// Starts over on the same input.
    pub fn reset(&mut self) {
        let input: String = self.run.input.iter().map(Symbol::as_str).collect();
        self.run = RunState::new(self.pda, &input);
    }

    /// Ends a running run as rejected, for callers enforcing their own budget.
    pub fn halt(&mut self) {
        if !self.run.is_finished() {
            self.run.status = RunStatus::Rejected;
        }
    }

    pub fn step(&mut self) -> StepReport {
        if self.run.is_finished() {
            return StepReport::stop("Simulation is already finished.");
        }

        if self.accepting_now() {
            return self.accept();
        }

        let pda = self.pda;
        let next = self.run.next_symbol().cloned();
        let candidates = pda.table().lookup(
            &self.run.configuration.state,
            next.as_ref(),
            self.run.configuration.stack.top(),
        );

        let (transition, consumed) = if let Some(first) = candidates.consuming.first() {
            (*first, next)
        } else if let Some(first) = candidates.epsilon.first() {
            (*first, None)
        } else {
            self.run.status = RunStatus::Rejected;
            tracing::debug!(
                state = %self.run.configuration.state,
                cursor = self.run.configuration.cursor,
                "no applicable transition"
            );
            return StepReport::stop("No valid transition. Rejected.");
        };

        let (stack, ops) = transition.apply_to(&self.run.configuration.stack);
        let configuration = Configuration {
            state: transition.to.clone(),
            cursor: self.run.configuration.cursor + usize::from(consumed.is_some()),
            stack,
        };
        self.run.steps += 1;
        self.run.history.push(TraceEntry::moved(
            &configuration,
            transition,
            &ops,
            consumed.as_ref(),
            &self.run.input,
            self.run.steps,
        ));
        self.run.configuration = configuration;
        tracing::trace!(step = self.run.steps, %transition, "step taken");

        if self.accepting_now() {
            return self.accept();
        }

        StepReport {
            continues: true,
            message: format!("Transitioned to {}", transition.to),
        }
    }

    fn accepting_now(&self) -> bool {
        self.run.input_exhausted() && self.pda.is_accepting(&self.run.configuration.state)
    }

    fn accept(&mut self) -> StepReport {
        self.run.status = RunStatus::Accepted;
        self.run.history.push(TraceEntry::accepted(
            &self.run.configuration,
            &self.run.input,
            self.run.steps,
        ));
        StepReport::stop("Accepted!")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepConfig {
    /// Moves allowed before a run is abandoned as rejected.
    pub max_steps: usize,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl StepConfig {
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }
}

/// Runs the step driver to completion under a step budget.
#[derive(Clone, Debug, Default)]
pub struct StepExecutor {
    config: StepConfig,
}

impl StepExecutor {
    pub fn new(config: StepConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }
}

impl Executor for StepExecutor {
    fn name(&self) -> &'static str {
        "stepper"
    }

    fn execute(&self, pda: &Pda, input: &str) -> Outcome {
        let mut driver = StepDriver::new(pda, input);
        let message = loop {
            if driver.run_state().steps >= self.config.max_steps && !driver.run_state().is_finished()
            {
                driver.halt();
                break format!("step budget of {} exhausted", self.config.max_steps);
            }
            let report = driver.step();
            if !report.continues {
                break report.message;
            }
        };

        let run = driver.into_run_state();
        Outcome {
            engine: self.name(),
            input: input.to_string(),
            verdict: Verdict::from(run.status == RunStatus::Accepted),
            stats: RunStats {
                explored: run.steps,
                deepest: run.steps,
                ..RunStats::default()
            },
            trace: Trace {
                policy: RecordingPolicy::Exhaustive,
                entries: run.history,
            },
            message: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PdaBuilder;

    fn parens() -> Pda {
        PdaBuilder::new()
            .states(["q", "qf"])
            .start("q")
            .accept(["qf"])
            .rule("q,(,ε -> q,X")
            .rule("q,),X -> q,ε")
            .rule("q,ε,Z -> qf,Z")
            .compile()
            .unwrap()
    }

    #[test]
    fn walks_balanced_input_to_acceptance() {
        let pda = parens();
        let mut driver = StepDriver::new(&pda, "()");
        assert_eq!(driver.step().message, "Transitioned to q");
        assert_eq!(driver.run_state().configuration.stack.to_string(), "[X, Z]");
        assert!(driver.step().continues);
        let last = driver.step();
        assert!(!last.continues);
        assert_eq!(last.message, "Accepted!");
        assert_eq!(driver.status(), RunStatus::Accepted);
    }

    #[test]
    fn terminal_states_absorb() {
        let pda = parens();
        let mut driver = StepDriver::new(&pda, ")");
        driver.step();
        driver.step();
        assert_eq!(driver.status(), RunStatus::Rejected);
        let before = driver.run_state().clone();
        let report = driver.step();
        assert_eq!(report.message, "Simulation is already finished.");
        assert_eq!(driver.run_state(), &before);
    }

    #[test]
    fn reset_starts_over() {
        let pda = parens();
        let mut driver = StepDriver::new(&pda, "()");
        driver.step();
        driver.reset();
        assert_eq!(driver.run_state().steps, 0);
        assert_eq!(driver.run_state().history.len(), 1);
        assert_eq!(driver.status(), RunStatus::Running);
    }

    #[test]
    fn budget_rejects_endless_runs() {
        let pda = PdaBuilder::new()
            .states(["q"])
            .start("q")
            .rule("q,ε,ε -> q,A")
            .compile()
            .unwrap();
        let outcome = StepExecutor::new(StepConfig::default().with_max_steps(25)).execute(&pda, "");
        assert_eq!(outcome.verdict, Verdict::Rejected);
        assert_eq!(outcome.stats.explored, 25);
        assert_eq!(outcome.message.as_deref(), Some("step budget of 25 exhausted"));
    }
}
