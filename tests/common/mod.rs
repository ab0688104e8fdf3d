//! # Shared test fixtures
//!
//! Sample automata and input enumeration.

#![allow(dead_code)]

use pushdown::{Pda, PdaBuilder};

/// Balanced parentheses over X with bottom Z.
pub fn balanced() -> Pda {
    PdaBuilder::new()
        .states(["q", "qf"])
        .start("q")
        .accept(["qf"])
        .rule("q,(,ε -> q,X")
        .rule("q,),X -> q,ε")
        .rule("q,ε,Z -> qf,Z")
        .compile()
        .expect("balanced parentheses compile")
}

/// a^n b^n, n >= 1. Deterministic.
pub fn anbn() -> Pda {
    PdaBuilder::new()
        .states(["q0", "q1", "q2"])
        .start("q0")
        .accept(["q2"])
        .rule("q0,a,Z -> q0,AZ")
        .rule("q0,a,A -> q0,AA")
        .rule("q0,b,A -> q1,ε")
        .rule("q1,b,A -> q1,ε")
        .rule("q1,ε,Z -> q2,Z")
        .compile()
        .expect("anbn compiles")
}

/// w c reverse(w) over {a, b}. Deterministic thanks to the centre marker.
pub fn wcwr() -> Pda {
    PdaBuilder::new()
        .states(["push", "pop", "done"])
        .start("push")
        .accept(["done"])
        .rule("push,a,ε -> push,A")
        .rule("push,b,ε -> push,B")
        .rule("push,c,ε -> pop,ε")
        .rule("pop,a,A -> pop,ε")
        .rule("pop,b,B -> pop,ε")
        .rule("pop,ε,Z -> done,Z")
        .compile()
        .expect("wcwr compiles")
}

/// Even-length palindromes; guesses the middle, so only backtracking finds it.
pub fn palindromes() -> Pda {
    pushdown::presets::compile("even-palindromes").expect("preset compiles")
}

/// Every string over `alphabet` of length at most `max_len`, shortest first.
pub fn all_strings(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut out = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for prefix in &frontier {
            for c in alphabet {
                let mut s = prefix.clone();
                s.push(*c);
                next.push(s);
            }
        }
        out.extend(next.iter().cloned());
        frontier = next;
    }
    out
}
