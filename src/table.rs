//! Transition lookup.
//!
//! Transitions are filed under their exact `(state, input, top)` key. A lookup for a
//! concrete configuration gathers every key that can fire there, split into epsilon-input
//! and input-consuming candidates because the engines try the two groups in a fixed order.

use std::collections::HashMap;

use crate::model::{Guard, StackSymbol, State, Symbol, Transition, TransitionKey};

#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    entries: HashMap<TransitionKey, Vec<Transition>>,
    len: usize,
}

/// Moves applicable to one configuration.
///
/// Within each group, transitions matching the literal stack top come before those with an
/// epsilon top condition; alternatives sharing a key keep definition order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidates<'a> {
    pub epsilon: Vec<&'a Transition>,
    pub consuming: Vec<&'a Transition>,
}

impl<'a> Candidates<'a> {
    pub fn is_empty(&self) -> bool {
        self.epsilon.is_empty() && self.consuming.is_empty()
    }

    pub fn len(&self) -> usize {
        self.epsilon.len() + self.consuming.len()
    }

    /// Epsilon candidates first, then consuming ones.
    pub fn iter(&self) -> impl Iterator<Item = &'a Transition> + '_ {
        self.epsilon.iter().chain(self.consuming.iter()).copied()
    }
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transitions<I>(transitions: I) -> Self
    where
        I: IntoIterator<Item = Transition>,
    {
        let mut table = Self::new();
        for transition in transitions {
            table.insert(transition);
        }
        table
    }

    pub fn insert(&mut self, transition: Transition) {
        self.entries
            .entry(transition.key())
            .or_default()
            .push(transition);
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Alternatives filed under exactly this key.
    pub fn alternatives(
        &self,
        state: &State,
        input: &Guard<Symbol>,
        top: &Guard<StackSymbol>,
    ) -> &[Transition] {
        self.entries
            .get(&(state.clone(), input.clone(), top.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Everything that can fire in `state` with `input` next (None once input is
    /// exhausted) and `top` on the stack (None for an empty stack).
    pub fn lookup(
        &self,
        state: &State,
        input: Option<&Symbol>,
        top: Option<&StackSymbol>,
    ) -> Candidates<'_> {
        let epsilon = self.matching(state, &Guard::Epsilon, top);
        let consuming = match input {
            Some(symbol) => self.matching(state, &Guard::Symbol(symbol.clone()), top),
            None => Vec::new(),
        };
        Candidates { epsilon, consuming }
    }

    fn matching(
        &self,
        state: &State,
        input: &Guard<Symbol>,
        top: Option<&StackSymbol>,
    ) -> Vec<&Transition> {
        let mut found = Vec::new();
        if let Some(top) = top {
            found.extend(self.alternatives(state, input, &Guard::Symbol(top.clone())));
        }
        found.extend(self.alternatives(state, input, &Guard::Epsilon));
        found
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.entries.values().flatten()
    }
}
