use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::symbol::{StackSymbol, State, Symbol};
use super::transition::Transition;
use crate::errors::{ErrorKind, PdaError};
use crate::syntax;

/// Marker pushed at the start of every run when a definition names none.
pub const DEFAULT_BOTTOM: char = 'Z';

/// Plain description of a PDA as entered by a user.
///
/// Nothing here is checked; [`crate::Pda::new`] turns a definition into something the
/// engines can run, and [`crate::validate::lint`] reports suspicious content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PdaDefinition {
    pub states: BTreeSet<State>,
    pub input_alphabet: BTreeSet<Symbol>,
    pub stack_alphabet: BTreeSet<StackSymbol>,
    pub start: Option<State>,
    pub bottom: StackSymbol,
    pub accept: BTreeSet<State>,
    pub transitions: Vec<Transition>,
}

impl Default for PdaDefinition {
    fn default() -> Self {
        Self {
            states: BTreeSet::new(),
            input_alphabet: BTreeSet::new(),
            stack_alphabet: BTreeSet::new(),
            start: None,
            bottom: StackSymbol::from(DEFAULT_BOTTOM),
            accept: BTreeSet::new(),
            transitions: Vec::new(),
        }
    }
}

/// Fluent construction of a [`PdaDefinition`].
///
/// Transitions given in notation form are parsed eagerly; the first failure is kept and
/// returned by [`PdaBuilder::build`].
#[derive(Debug, Default)]
pub struct PdaBuilder {
    definition: PdaDefinition,
    error: Option<PdaError>,
}

impl PdaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.definition
            .states
            .extend(states.into_iter().map(State::new));
        self
    }

    /// One input symbol per grapheme of `symbols`.
    pub fn input_alphabet(mut self, symbols: &str) -> Self {
        self.definition
            .input_alphabet
            .extend(Symbol::sequence(symbols));
        self
    }

    /// One stack symbol per grapheme of `symbols`.
    pub fn stack_alphabet(mut self, symbols: &str) -> Self {
        self.definition
            .stack_alphabet
            .extend(StackSymbol::sequence(symbols));
        self
    }

    pub fn start(mut self, state: &str) -> Self {
        self.definition.start = Some(State::new(state));
        self
    }

    pub fn bottom(mut self, symbol: char) -> Self {
        self.definition.bottom = StackSymbol::from(symbol);
        self
    }

    pub fn accept<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.definition
            .accept
            .extend(states.into_iter().map(State::new));
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.definition.transitions.push(transition);
        self
    }

    /// Adds a transition written as `from,input,top -> to,push`.
    pub fn rule(mut self, notation: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        match syntax::parse_transition(notation) {
            Ok(transition) => self.definition.transitions.push(transition),
            Err(error) => self.error = Some(error),
        }
        self
    }

    pub fn build(self) -> Result<PdaDefinition, PdaError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.definition),
        }
    }

    /// Builds and validates in one go.
    pub fn compile(self) -> Result<super::Pda, PdaError> {
        super::Pda::new(self.build()?)
    }
}

impl PdaDefinition {
    /// Structural requirements every runnable definition must meet.
    pub fn check_structure(&self) -> Result<&State, PdaError> {
        if self.states.is_empty() {
            return Err(undefined("the state set is empty"));
        }
        let Some(start) = &self.start else {
            return Err(undefined("no start state is set"));
        };
        if !self.states.contains(start) {
            return Err(undefined(&format!(
                "start state '{start}' is not in the state set"
            )));
        }
        Ok(start)
    }
}

fn undefined(reason: &str) -> PdaError {
    PdaError::unsourced(
        ErrorKind::UndefinedPda {
            reason: reason.to_string(),
        },
        "definition",
    )
    .with_help("declare at least one state and choose one of them as the start state")
}
