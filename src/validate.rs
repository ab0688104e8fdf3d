//! Definition linting.
//!
//! The engines run anything with a state set and a start state. `lint` points out the
//! things that usually mean a typo: references to undeclared states, symbols outside a
//! declared alphabet, and states no transition can reach. Only the structural problems are
//! errors; everything else comes back as a warning.

use std::collections::{BTreeSet, VecDeque};

use crate::errors::{ErrorKind, PdaError};
use crate::model::{Guard, PdaDefinition, State};

const PHASE: &str = "lint";

/// All findings for `definition`, errors first.
pub fn lint(definition: &PdaDefinition) -> Vec<PdaError> {
    if let Err(error) = definition.check_structure() {
        return vec![error];
    }

    let mut findings = Vec::new();
    check_accept_states(definition, &mut findings);
    check_transition_states(definition, &mut findings);
    check_alphabets(definition, &mut findings);
    check_reachability(definition, &mut findings);
    findings
}

/// True when `findings` holds anything stronger than a warning.
pub fn has_errors(findings: &[PdaError]) -> bool {
    findings.iter().any(|f| !f.is_warning())
}

fn warning(kind: ErrorKind, help: &str) -> PdaError {
    PdaError::unsourced(kind, PHASE).with_help(help).as_warning()
}

fn unknown_state(state: &State, role: &str) -> PdaError {
    warning(
        ErrorKind::UnknownState {
            state: state.to_string(),
        },
        &format!("add '{state}' to the state set or fix the {role}"),
    )
}

fn check_accept_states(definition: &PdaDefinition, findings: &mut Vec<PdaError>) {
    for state in &definition.accept {
        if !definition.states.contains(state) {
            findings.push(unknown_state(state, "accept list"));
        }
    }
}

fn check_transition_states(definition: &PdaDefinition, findings: &mut Vec<PdaError>) {
    let mut reported = BTreeSet::new();
    for transition in &definition.transitions {
        for state in [&transition.from, &transition.to] {
            if !definition.states.contains(state) && reported.insert(state.clone()) {
                findings.push(unknown_state(state, &format!("transition {transition}")));
            }
        }
    }
}

fn check_alphabets(definition: &PdaDefinition, findings: &mut Vec<PdaError>) {
    let outside = |symbol: &str, alphabet: &str, help: String| {
        warning(
            ErrorKind::SymbolOutsideAlphabet {
                symbol: symbol.to_string(),
                alphabet: alphabet.to_string(),
            },
            &help,
        )
    };

    let mut reported_input = BTreeSet::new();
    let mut reported_stack = BTreeSet::new();

    let stack_declared = !definition.stack_alphabet.is_empty();
    if stack_declared && !definition.stack_alphabet.contains(&definition.bottom) {
        reported_stack.insert(definition.bottom.clone());
        findings.push(outside(
            definition.bottom.as_str(),
            "stack",
            "the bottom-of-stack marker is usually part of the stack alphabet".into(),
        ));
    }

    for transition in &definition.transitions {
        if let Guard::Symbol(symbol) = &transition.input {
            if !definition.input_alphabet.is_empty()
                && !definition.input_alphabet.contains(symbol)
                && reported_input.insert(symbol.clone())
            {
                findings.push(outside(
                    symbol.as_str(),
                    "input",
                    format!("used by {transition}"),
                ));
            }
        }
        if !stack_declared {
            continue;
        }
        let pushed = transition.push.iter();
        for symbol in transition.top.as_symbol().into_iter().chain(pushed) {
            if !definition.stack_alphabet.contains(symbol) && reported_stack.insert(symbol.clone())
            {
                findings.push(outside(
                    symbol.as_str(),
                    "stack",
                    format!("used by {transition}"),
                ));
            }
        }
    }
}

/// Walks the state graph from the start state, ignoring input and stack conditions.
fn check_reachability(definition: &PdaDefinition, findings: &mut Vec<PdaError>) {
    let Some(start) = &definition.start else {
        return;
    };

    let mut reached = BTreeSet::from([start.clone()]);
    let mut queue = VecDeque::from([start.clone()]);
    while let Some(state) = queue.pop_front() {
        for transition in definition.transitions.iter().filter(|t| t.from == state) {
            if reached.insert(transition.to.clone()) {
                queue.push_back(transition.to.clone());
            }
        }
    }

    for state in definition.states.difference(&reached) {
        findings.push(warning(
            ErrorKind::UnreachableState {
                state: state.to_string(),
            },
            "no chain of transitions leads here from the start state",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;
    use crate::model::PdaBuilder;

    #[test]
    fn structural_problems_are_errors() {
        let findings = lint(&PdaDefinition::default());
        assert_eq!(findings.len(), 1);
        assert!(has_errors(&findings));
        assert_eq!(findings[0].kind.category(), ErrorCategory::Definition);
    }

    #[test]
    fn clean_definition_has_no_findings() {
        let definition = PdaBuilder::new()
            .states(["q", "qf"])
            .input_alphabet("()")
            .stack_alphabet("XZ")
            .start("q")
            .accept(["qf"])
            .rule("q,(,ε -> q,X")
            .rule("q,),X -> q,ε")
            .rule("q,ε,Z -> qf,Z")
            .build()
            .unwrap();
        assert!(lint(&definition).is_empty());
    }

    #[test]
    fn typos_become_warnings() {
        let definition = PdaBuilder::new()
            .states(["q", "qf", "island"])
            .input_alphabet("a")
            .stack_alphabet("Z")
            .start("q")
            .accept(["qf", "qF"])
            .rule("q,b,Z -> qf,YZ")
            .rule("q,a,Z -> gf,Z")
            .build()
            .unwrap();
        let findings = lint(&definition);
        assert!(!has_errors(&findings));

        let kinds: Vec<_> = findings.iter().map(|f| f.kind.code_suffix()).collect();
        assert_eq!(kinds.iter().filter(|k| **k == "unknown_state").count(), 2);
        assert_eq!(
            kinds.iter().filter(|k| **k == "symbol_outside_alphabet").count(),
            2
        );
        assert_eq!(kinds.iter().filter(|k| **k == "unreachable_state").count(), 1);
    }
}
