use serde::{Deserialize, Serialize};

use super::definition::PdaDefinition;
use super::stack::Stack;
use super::symbol::{StackSymbol, State};
use crate::errors::PdaError;
use crate::table::TransitionTable;

/// A complete instantaneous description of one computation branch.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Configuration {
    pub state: State,
    /// Number of input symbols consumed so far.
    pub cursor: usize,
    pub stack: Stack,
}

/// A definition that passed the structural checks, with its lookup table built.
///
/// Immutable for its whole lifetime; every simulation request builds or borrows one.
#[derive(Debug, Clone)]
pub struct Pda {
    definition: PdaDefinition,
    start: State,
    table: TransitionTable,
}

impl Pda {
    /// Fails with `UndefinedPda` when the state set is empty or the start state is
    /// missing. Nothing else about the definition is rejected.
    pub fn new(definition: PdaDefinition) -> Result<Self, PdaError> {
        let start = definition.check_structure()?.clone();
        let table = TransitionTable::from_transitions(definition.transitions.iter().cloned());
        tracing::debug!(
            states = definition.states.len(),
            transitions = table.len(),
            start = %start,
            "compiled PDA"
        );
        Ok(Self {
            definition,
            start,
            table,
        })
    }

    pub fn definition(&self) -> &PdaDefinition {
        &self.definition
    }

    pub fn start(&self) -> &State {
        &self.start
    }

    pub fn bottom(&self) -> &StackSymbol {
        &self.definition.bottom
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    pub fn is_accepting(&self, state: &State) -> bool {
        self.definition.accept.contains(state)
    }

    /// Start state, nothing consumed, bottom marker alone on the stack.
    pub fn initial_configuration(&self) -> Configuration {
        Configuration {
            state: self.start.clone(),
            cursor: 0,
            stack: Stack::with_bottom(self.bottom().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::model::PdaBuilder;

    #[test]
    fn empty_state_set_is_undefined() {
        let err = Pda::new(PdaDefinition::default()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UndefinedPda { .. }));
    }

    #[test]
    fn missing_start_is_undefined() {
        let err = PdaBuilder::new().states(["q0"]).compile().unwrap_err();
        assert!(err.to_string().contains("no start state"));
    }

    #[test]
    fn initial_configuration_holds_only_bottom() {
        let pda = PdaBuilder::new()
            .states(["q0"])
            .start("q0")
            .bottom('$')
            .compile()
            .unwrap();
        let initial = pda.initial_configuration();
        assert_eq!(initial.cursor, 0);
        assert_eq!(initial.stack.to_string(), "[$]");
    }
}
