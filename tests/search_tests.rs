mod common;

use common::{all_strings, anbn, balanced, palindromes};
use pushdown::model::{StackSymbol, Transition};
use pushdown::syntax::parse_transition;
use pushdown::trace::EntryKind;
use pushdown::{CyclePolicy, PdaBuilder, RecordingPolicy, SearchConfig, SearchEngine, Stack, Verdict};

fn is_even_palindrome(s: &str) -> bool {
    s.len() % 2 == 0 && s.chars().eq(s.chars().rev())
}

#[test]
fn balanced_parentheses() {
    let pda = balanced();
    let engine = SearchEngine::default();
    assert!(engine.accepts(&pda, "()"));
    assert!(engine.accepts(&pda, ""));
    assert!(engine.accepts(&pda, "(())()"));
    assert!(!engine.accepts(&pda, "("));
    assert!(!engine.accepts(&pda, ")("));
    assert!(!engine.accepts(&pda, "())"));
}

#[test]
fn anbn_language() {
    let pda = anbn();
    let engine = SearchEngine::default();
    for word in ["ab", "aabb", "aaabbb"] {
        assert!(engine.accepts(&pda, word), "{word}");
    }
    for word in ["", "aab", "aaabb", "ba", "abab"] {
        assert!(!engine.accepts(&pda, word), "{word}");
    }
}

#[test]
fn palindromes_need_backtracking_and_get_it() {
    let pda = palindromes();
    let engine = SearchEngine::default();
    for word in all_strings(&['a', 'b'], 6) {
        assert_eq!(engine.accepts(&pda, &word), is_even_palindrome(&word), "{word:?}");
    }
}

#[test]
fn unreachable_transition_changes_nothing() {
    let plain = anbn();
    let mut definition = plain.definition().clone();
    definition
        .transitions
        .push(parse_transition("ghost,a,Z -> q2,Z").unwrap());
    let extended = pushdown::Pda::new(definition).unwrap();

    let engine = SearchEngine::default();
    for word in all_strings(&['a', 'b'], 6) {
        assert_eq!(engine.accepts(&plain, &word), engine.accepts(&extended, &word), "{word:?}");
    }
}

#[test]
fn epsilon_top_moves_never_shrink_the_stack() {
    let stack = Stack::with_bottom(StackSymbol::from('Z')).push_sequence(&[StackSymbol::from('A')]);
    for line in ["q,ε,ε -> q,ε", "q,a,ε -> q,B", "q,ε,ε -> q,BC"] {
        let transition: Transition = parse_transition(line).unwrap();
        let (after, _) = transition.apply_to(&stack);
        assert_eq!(after.len(), stack.len() + transition.push.len(), "{line}");
    }
}

#[test]
fn push_then_pop_restores_the_stack() {
    let stack = Stack::with_bottom(StackSymbol::from('Z'));
    let push = parse_transition("q,ε,ε -> q,A").unwrap();
    let pop = parse_transition("q,ε,A -> q,ε").unwrap();
    let (pushed, _) = push.apply_to(&stack);
    let (popped, _) = pop.apply_to(&pushed);
    assert_eq!(popped, stack);
}

#[test]
fn epsilon_loop_terminates_at_default_depth() {
    let looping = PdaBuilder::new()
        .states(["q", "f"])
        .start("q")
        .accept(["f"])
        .rule("q,ε,ε -> q,A")
        .compile()
        .unwrap();
    let outcome = SearchEngine::default().run(&looping, "ab");
    assert_eq!(outcome.verdict, Verdict::Rejected);
    assert_eq!(outcome.stats.deepest, pushdown::engine::DEFAULT_MAX_DEPTH);
    assert_eq!(outcome.stats.depth_limit_hits, 1);
    assert!(outcome.message.unwrap().contains("depth limit of 1000"));
}

#[test]
fn repeat_pruning_agrees_with_depth_bound() {
    let pruning = SearchEngine::new(SearchConfig::default().with_cycle_policy(CyclePolicy::PruneRepeats));
    let bounded = SearchEngine::default();
    for pda in [balanced(), palindromes()] {
        for word in all_strings(&['a', 'b', '(', ')'], 4) {
            assert_eq!(pruning.accepts(&pda, &word), bounded.accepts(&pda, &word), "{word:?}");
        }
    }
}

#[test]
fn accepting_path_is_connected_and_contained_in_exhaustive() {
    let pda = palindromes();
    let path = SearchEngine::default().run(&pda, "abba");
    let all = SearchEngine::new(SearchConfig::default().with_recording(RecordingPolicy::Exhaustive))
        .run(&pda, "abba");
    assert!(path.is_accepted() && all.is_accepted());
    assert!(all.trace.len() > path.trace.len());

    // The accepting path shows up inside the exhaustive trace, in the same order.
    let mut remaining = all.trace.iter();
    for entry in &path.trace {
        assert!(remaining.any(|e| e == entry), "missing {entry}");
    }

    let entries = &path.trace.entries;
    assert_eq!(entries[0].kind, EntryKind::Initial);
    assert_eq!(entries.last().unwrap().kind, EntryKind::Accept);
    for pair in entries.windows(2) {
        assert!(pair[1].cursor >= pair[0].cursor);
        if let Some(transition) = &pair[1].transition {
            assert_eq!(transition.from, pair[0].state);
            assert_eq!(transition.to, pair[1].state);
        }
    }
    assert_eq!(path.trace.lines().last().unwrap(), "State: done, Input: '', Stack: [Z], Transition: ACCEPT, Operation: Accepting state reached");
}

#[test]
fn trace_serializes_to_json() {
    let outcome = SearchEngine::default().run(&anbn(), "ab");
    let json = outcome.trace.to_json().unwrap();
    let back: pushdown::Trace = serde_json::from_str(&json).unwrap();
    assert_eq!(back, outcome.trace);
}
