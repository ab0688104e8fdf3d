use serde::{Deserialize, Serialize};
use std::fmt;

use super::stack::{Stack, StackOp};
use super::symbol::{Guard, StackSymbol, State, Symbol, EPSILON};

/// One alternative of the transition relation:
/// `(from, input, top) → (to, push)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub from: State,
    pub input: Guard<Symbol>,
    pub top: Guard<StackSymbol>,
    pub to: State,
    pub push: Vec<StackSymbol>,
}

/// The lookup key a transition is filed under.
pub type TransitionKey = (State, Guard<Symbol>, Guard<StackSymbol>);

impl Transition {
    pub fn new(
        from: State,
        input: Guard<Symbol>,
        top: Guard<StackSymbol>,
        to: State,
        push: Vec<StackSymbol>,
    ) -> Self {
        Self {
            from,
            input,
            top,
            to,
            push,
        }
    }

    pub fn key(&self) -> TransitionKey {
        (self.from.clone(), self.input.clone(), self.top.clone())
    }

    /// Whether taking this move advances the input cursor.
    pub fn consumes(&self) -> bool {
        !self.input.is_epsilon()
    }

    pub fn apply_to(&self, stack: &Stack) -> (Stack, Vec<StackOp>) {
        stack.apply(&self.top, &self.push)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{} → {},", self.from, self.input, self.top, self.to)?;
        if self.push.is_empty() {
            return f.write_str(EPSILON);
        }
        for symbol in &self.push {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}
