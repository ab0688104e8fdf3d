//! Persistent pushdown stack.
//!
//! Every operation returns a new [`Stack`] and leaves the receiver untouched, so sibling
//! search branches can hold their own stacks without copying. The backing `im::Vector`
//! shares structure between versions.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::symbol::{Guard, StackSymbol};

/// Bottom of the stack is index 0; the top is the last element.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stack {
    items: Vector<StackSymbol>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh run's stack: just the bottom-of-stack marker.
    pub fn with_bottom(bottom: StackSymbol) -> Self {
        Self {
            items: Vector::unit(bottom),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn top(&self) -> Option<&StackSymbol> {
        self.items.back()
    }

    /// Removes the top. Popping an empty stack is a no-op and yields `None`.
    pub fn pop(&self) -> (Self, Option<StackSymbol>) {
        let mut items = self.items.clone();
        let popped = items.pop_back();
        (Self { items }, popped)
    }

    /// Pushes `sequence` so that its first symbol ends up on top.
    pub fn push_sequence(&self, sequence: &[StackSymbol]) -> Self {
        let mut items = self.items.clone();
        for symbol in sequence.iter().rev() {
            items.push_back(symbol.clone());
        }
        Self { items }
    }

    /// Applies one move's stack effect: pop unless the top condition is epsilon, then push.
    pub fn apply(&self, top: &Guard<StackSymbol>, push: &[StackSymbol]) -> (Self, Vec<StackOp>) {
        let mut items = self.items.clone();
        let mut ops = Vec::with_capacity(push.len() + 1);

        if !top.is_epsilon() {
            if let Some(popped) = items.pop_back() {
                ops.push(StackOp::Pop(popped));
            }
        }
        for symbol in push.iter().rev() {
            items.push_back(symbol.clone());
            ops.push(StackOp::Push(symbol.clone()));
        }

        (Self { items }, ops)
    }

    /// Symbols from top to bottom.
    pub fn top_first(&self) -> Vec<StackSymbol> {
        self.items.iter().rev().cloned().collect()
    }

    /// Symbols from bottom to top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &StackSymbol> + '_ {
        self.items.iter()
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, symbol) in self.items.iter().rev().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{symbol}")?;
        }
        write!(f, "]")
    }
}

/// One primitive stack mutation, kept for trace descriptions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "symbol", rename_all = "lowercase")]
pub enum StackOp {
    Pop(StackSymbol),
    Push(StackSymbol),
}

impl fmt::Display for StackOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackOp::Pop(symbol) => write!(f, "POP {symbol}"),
            StackOp::Push(symbol) => write!(f, "PUSH {symbol}"),
        }
    }
}

/// `POP X; PUSH A`, or `No stack operation` when nothing changed.
pub fn describe_ops(ops: &[StackOp]) -> String {
    if ops.is_empty() {
        return "No stack operation".to_string();
    }
    ops.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
