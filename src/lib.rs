//! # Pushdown
//!
//! Define, run, trace and step through nondeterministic pushdown automata.
//!
//! - **`model`**: symbols, the persistent stack, transitions, definitions, [`Pda`]
//! - **`table`**: transition lookup by `(state, input, top)`
//! - **`engine`**: the backtracking [`SearchEngine`] and the single-step driver
//! - **`trace`**: recording policies and replayable traces
//! - **`syntax`**: transition notation and YAML/JSON definition documents
//! - **`validate`**, **`presets`**, **`cli`**: linting, sample PDAs, the command line
//!
//! ```
//! use pushdown::{PdaBuilder, SearchEngine};
//!
//! let pda = PdaBuilder::new()
//!     .states(["q0", "q1", "q2"])
//!     .start("q0")
//!     .accept(["q2"])
//!     .rule("q0,a,Z -> q0,AZ")
//!     .rule("q0,a,A -> q0,AA")
//!     .rule("q0,b,A -> q1,ε")
//!     .rule("q1,b,A -> q1,ε")
//!     .rule("q1,ε,Z -> q2,Z")
//!     .compile()?;
//! assert!(SearchEngine::default().accepts(&pda, "aabb"));
//! assert!(!SearchEngine::default().accepts(&pda, "aab"));
//! # Ok::<(), pushdown::PdaError>(())
//! ```

pub mod cli;
pub mod engine;
pub mod errors;
pub mod model;
pub mod presets;
pub mod syntax;
pub mod table;
pub mod trace;
pub mod validate;

pub use engine::{
    compare, CyclePolicy, Executor, Outcome, RunState, RunStatus, SearchConfig, SearchEngine,
    StepConfig, StepDriver, StepExecutor, Verdict,
};
pub use errors::{ErrorKind, PdaError};
pub use model::{Configuration, Pda, PdaBuilder, PdaDefinition, Stack, Transition};
pub use trace::{RecordingPolicy, Trace, TraceEntry};

/// The types most callers need.
pub mod prelude {
    pub use crate::engine::{Executor, SearchConfig, SearchEngine, StepDriver, StepExecutor};
    pub use crate::errors::PdaError;
    pub use crate::model::{Pda, PdaBuilder};
    pub use crate::syntax::{load_definition, parse_transition};
    pub use crate::trace::RecordingPolicy;
}
