//! # Execution engines
//!
//! Two deliberately different strategies share the [`Executor`] capability:
//!
//! - **`search`**: exhaustive depth-first search with backtracking. Decides acceptance
//!   correctly for nondeterministic PDAs, within its depth bound.
//! - **`stepper`**: one move per call, always the first applicable transition, never
//!   backtracks. Explainable for animation, but it falsely rejects inputs whose only
//!   accepting derivation needs a choice other than the first one.
//!
//! On deterministic PDAs both give the same verdict; [`compare`] shows where they part.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::Pda;
use crate::trace::Trace;

pub mod search;
pub mod stepper;

pub use search::{CyclePolicy, SearchConfig, SearchEngine, DEFAULT_MAX_DEPTH};
pub use stepper::{RunState, RunStatus, StepConfig, StepDriver, StepExecutor, StepReport};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Accepted,
    Rejected,
}

impl Verdict {
    pub fn is_accepted(self) -> bool {
        self == Verdict::Accepted
    }
}

impl From<bool> for Verdict {
    fn from(accepted: bool) -> Self {
        if accepted {
            Verdict::Accepted
        } else {
            Verdict::Rejected
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => f.write_str("ACCEPTED"),
            Verdict::Rejected => f.write_str("REJECTED"),
        }
    }
}

/// Counters collected during one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Configurations examined (search) or moves taken (stepper).
    pub explored: usize,
    pub deepest: usize,
    /// Branches cut off by the depth bound.
    pub depth_limit_hits: usize,
    /// Branches cut off because their configuration repeated on the current path.
    pub pruned_repeats: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct Outcome {
    pub engine: &'static str,
    pub input: String,
    pub verdict: Verdict,
    pub trace: Trace,
    pub stats: RunStats,
    pub message: Option<String>,
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        self.verdict.is_accepted()
    }
}

/// Shared "run this PDA on this input" capability.
pub trait Executor {
    fn name(&self) -> &'static str;

    fn execute(&self, pda: &Pda, input: &str) -> Outcome;

    fn accepts(&self, pda: &Pda, input: &str) -> bool {
        self.execute(pda, input).is_accepted()
    }
}

/// Both engines on the same input.
#[derive(Clone, Debug, Serialize)]
pub struct Comparison {
    pub input: String,
    pub search: Outcome,
    pub stepper: Outcome,
}

impl Comparison {
    /// True when the stepper's verdict differs from the search engine's.
    pub fn diverges(&self) -> bool {
        self.search.verdict != self.stepper.verdict
    }
}

pub fn compare(
    pda: &Pda,
    input: &str,
    search: &SearchEngine,
    stepper: &StepExecutor,
) -> Comparison {
    let comparison = Comparison {
        input: input.to_string(),
        search: search.execute(pda, input),
        stepper: stepper.execute(pda, input),
    };
    if comparison.diverges() {
        tracing::info!(
            input,
            search = %comparison.search.verdict,
            stepper = %comparison.stepper.verdict,
            "engines disagree"
        );
    }
    comparison
}
