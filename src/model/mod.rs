//! # PDA data model
//!
//! - **`symbol`**: input/stack symbols, states, and the epsilon-or-symbol [`Guard`]
//! - **`stack`**: the persistent pushdown stack and its primitive operations
//! - **`transition`**: one alternative of the transition relation
//! - **`definition`**: unchecked user-facing description plus a builder
//! - **`pda`**: the checked, runnable automaton and [`Configuration`]

pub mod definition;
pub mod pda;
pub mod stack;
pub mod symbol;
pub mod transition;

pub use definition::{PdaBuilder, PdaDefinition, DEFAULT_BOTTOM};
pub use pda::{Configuration, Pda};
pub use stack::{describe_ops, Stack, StackOp};
pub use symbol::{tokenize, Guard, StackSymbol, State, Symbol, EPSILON};
pub use transition::{Transition, TransitionKey};
