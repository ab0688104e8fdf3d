//! # Built-in sample PDAs
//!
//! A small fixed catalogue used by the `--preset` flag and by tests. Every entry is
//! built through [`PdaBuilder`] from notation strings, so the catalogue also exercises the
//! notation parser.
//!
//! # Example
//! ```
//! use pushdown::presets;
//! use pushdown::SearchEngine;
//!
//! let pda = presets::compile("anbn").unwrap();
//! assert!(SearchEngine::default().accepts(&pda, "aabb"));
//! ```

use crate::errors::{ErrorKind, PdaError};
use crate::model::{Pda, PdaBuilder, PdaDefinition};

#[derive(Debug)]
pub struct PresetInfo {
    pub name: &'static str,
    pub description: &'static str,
    /// Sample inputs shown by `pushdown presets`.
    pub samples: &'static [&'static str],
    build: fn() -> PdaBuilder,
}

impl PresetInfo {
    pub fn definition(&self) -> Result<PdaDefinition, PdaError> {
        (self.build)().build()
    }
}

const PRESETS: &[PresetInfo] = &[
    PresetInfo {
        name: "balanced-parens",
        description: "balanced parentheses, one X per open '('",
        samples: &["()", "(())()", "(()"],
        build: balanced_parens,
    },
    PresetInfo {
        name: "anbn",
        description: "a^n b^n for n >= 1",
        samples: &["ab", "aabb", "aab"],
        build: anbn,
    },
    PresetInfo {
        name: "even-palindromes",
        description: "even-length palindromes over {a, b}; needs backtracking",
        samples: &["abba", "abab", ""],
        build: even_palindromes,
    },
];

pub fn all() -> &'static [PresetInfo] {
    PRESETS
}

pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|p| p.name)
}

pub fn find(name: &str) -> Result<&'static PresetInfo, PdaError> {
    PRESETS.iter().find(|p| p.name == name).ok_or_else(|| {
        PdaError::unsourced(
            ErrorKind::UnknownPreset {
                name: name.to_string(),
            },
            "presets",
        )
        .with_help(format!(
            "available presets: {}",
            names().collect::<Vec<_>>().join(", ")
        ))
    })
}

pub fn definition(name: &str) -> Result<PdaDefinition, PdaError> {
    find(name)?.definition()
}

pub fn compile(name: &str) -> Result<Pda, PdaError> {
    Pda::new(definition(name)?)
}

fn balanced_parens() -> PdaBuilder {
    PdaBuilder::new()
        .states(["q", "qf"])
        .input_alphabet("()")
        .stack_alphabet("XZ")
        .start("q")
        .accept(["qf"])
        .rule("q,(,ε -> q,X")
        .rule("q,),X -> q,ε")
        .rule("q,ε,Z -> qf,Z")
}

fn anbn() -> PdaBuilder {
    PdaBuilder::new()
        .states(["q0", "q1", "q2"])
        .input_alphabet("ab")
        .stack_alphabet("AZ")
        .start("q0")
        .accept(["q2"])
        .rule("q0,a,Z -> q0,AZ")
        .rule("q0,a,A -> q0,AA")
        .rule("q0,b,A -> q1,ε")
        .rule("q1,b,A -> q1,ε")
        .rule("q1,ε,Z -> q2,Z")
}

// Guesses the middle with an epsilon move; the stepper never does, so it rejects
// every non-empty palindrome here.
fn even_palindromes() -> PdaBuilder {
    PdaBuilder::new()
        .states(["push", "pop", "done"])
        .input_alphabet("ab")
        .stack_alphabet("ABZ")
        .start("push")
        .accept(["done"])
        .rule("push,a,ε -> push,A")
        .rule("push,b,ε -> push,B")
        .rule("push,ε,ε -> pop,ε")
        .rule("pop,a,A -> pop,ε")
        .rule("pop,b,B -> pop,ε")
        .rule("pop,ε,Z -> done,Z")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Executor, SearchEngine, StepExecutor};
    use crate::validate::lint;

    #[test]
    fn every_preset_compiles_and_lints_clean() {
        for preset in all() {
            let definition = preset.definition().unwrap();
            assert!(lint(&definition).is_empty(), "{}", preset.name);
            Pda::new(definition).unwrap();
        }
    }

    #[test]
    fn unknown_preset_lists_alternatives() {
        let err = find("nope").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownPreset { .. }));
        assert!(err.diagnostic_info.help.unwrap().contains("anbn"));
    }

    #[test]
    fn palindromes_separate_the_engines() {
        let pda = compile("even-palindromes").unwrap();
        assert!(SearchEngine::default().accepts(&pda, "abba"));
        assert!(!StepExecutor::default().accepts(&pda, "abba"));
        assert!(StepExecutor::default().accepts(&pda, ""));
    }
}
