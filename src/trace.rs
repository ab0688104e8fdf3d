//! Execution traces.
//!
//! Engines append [`TraceEntry`] values to a [`TraceRecorder`] as they move; renderers
//! consume the finished [`Trace`] at their own pace. Which entries survive depends on the
//! caller-selected [`RecordingPolicy`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{describe_ops, Configuration, StackOp, StackSymbol, State, Symbol, Transition};

/// What a recorder keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordingPolicy {
    /// Nothing at all.
    Off,
    /// Only the root-to-accept path; abandoned branches are rewound.
    #[default]
    AcceptingPath,
    /// Every explored configuration in exploration order. Branches cut off by the depth
    /// bound or the cycle policy are never entered, so they leave no entry.
    Exhaustive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Initial,
    Move,
    Accept,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub kind: EntryKind,
    pub state: State,
    pub cursor: usize,
    pub remaining: String,
    /// Top of the stack first.
    pub stack: Vec<StackSymbol>,
    pub transition: Option<Transition>,
    pub operation: Option<String>,
    pub consumed: Option<Symbol>,
    pub depth: usize,
}

impl TraceEntry {
    pub fn initial(config: &Configuration, input: &[Symbol]) -> Self {
        Self {
            kind: EntryKind::Initial,
            state: config.state.clone(),
            cursor: config.cursor,
            remaining: remaining(input, config.cursor),
            stack: config.stack.top_first(),
            transition: None,
            operation: None,
            consumed: None,
            depth: 0,
        }
    }

    /// The configuration `config` reached by taking `transition`.
    pub fn moved(
        config: &Configuration,
        transition: &Transition,
        ops: &[StackOp],
        consumed: Option<&Symbol>,
        input: &[Symbol],
        depth: usize,
    ) -> Self {
        let mut operation = describe_ops(ops);
        if let Some(symbol) = consumed {
            operation.push_str(&format!(" (consumed '{symbol}')"));
        }
        Self {
            kind: EntryKind::Move,
            state: config.state.clone(),
            cursor: config.cursor,
            remaining: remaining(input, config.cursor),
            stack: config.stack.top_first(),
            transition: Some(transition.clone()),
            operation: Some(operation),
            consumed: consumed.cloned(),
            depth,
        }
    }

    pub fn accepted(config: &Configuration, input: &[Symbol], depth: usize) -> Self {
        Self {
            kind: EntryKind::Accept,
            state: config.state.clone(),
            cursor: config.cursor,
            remaining: remaining(input, config.cursor),
            stack: config.stack.top_first(),
            transition: None,
            operation: Some("Accepting state reached".to_string()),
            consumed: None,
            depth,
        }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "State: {}, Input: '{}', Stack: [",
            self.state, self.remaining
        )?;
        for (i, symbol) in self.stack.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{symbol}")?;
        }
        write!(f, "]")?;
        match (&self.transition, self.kind) {
            (Some(transition), _) => write!(f, ", Transition: {transition}")?,
            (None, EntryKind::Accept) => write!(f, ", Transition: ACCEPT")?,
            _ => {}
        }
        if let Some(operation) = &self.operation {
            write!(f, ", Operation: {operation}")?;
        }
        Ok(())
    }
}

fn remaining(input: &[Symbol], cursor: usize) -> String {
    input
        .get(cursor..)
        .unwrap_or_default()
        .iter()
        .map(Symbol::as_str)
        .collect()
}

/// Append-only log with rewind support for the accepting-path policy.
#[derive(Debug, Clone, Default)]
pub struct TraceRecorder {
    policy: RecordingPolicy,
    entries: Vec<TraceEntry>,
}

impl TraceRecorder {
    pub fn new(policy: RecordingPolicy) -> Self {
        Self {
            policy,
            entries: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.policy != RecordingPolicy::Off
    }

    pub fn record(&mut self, entry: TraceEntry) {
        if self.is_enabled() {
            self.entries.push(entry);
        }
    }

    /// Builds the entry only when something will be kept.
    pub fn record_with(&mut self, entry: impl FnOnce() -> TraceEntry) {
        if self.is_enabled() {
            self.entries.push(entry());
        }
    }

    /// Position to rewind to if the branch about to be explored fails.
    pub fn mark(&self) -> usize {
        self.entries.len()
    }

    /// Drops everything recorded since `mark`. Only the accepting-path policy forgets.
    pub fn rewind(&mut self, mark: usize) {
        if self.policy == RecordingPolicy::AcceptingPath {
            self.entries.truncate(mark);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> Trace {
        Trace {
            policy: self.policy,
            entries: self.entries,
        }
    }
}

/// A finished, replayable trace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub policy: RecordingPolicy,
    pub entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&TraceEntry> {
        self.entries.last()
    }

    /// One human-readable line per entry.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stack;

    fn config(state: &str, cursor: usize) -> Configuration {
        Configuration {
            state: State::new(state),
            cursor,
            stack: Stack::with_bottom(StackSymbol::from('Z')),
        }
    }

    fn input() -> Vec<Symbol> {
        crate::model::tokenize("ab")
    }

    #[test]
    fn accepting_path_policy_rewinds() {
        let mut recorder = TraceRecorder::new(RecordingPolicy::AcceptingPath);
        recorder.record(TraceEntry::initial(&config("q0", 0), &input()));
        let mark = recorder.mark();
        recorder.record(TraceEntry::accepted(&config("q1", 1), &input(), 1));
        recorder.rewind(mark);
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn exhaustive_policy_keeps_abandoned_entries() {
        let mut recorder = TraceRecorder::new(RecordingPolicy::Exhaustive);
        recorder.record(TraceEntry::initial(&config("q0", 0), &input()));
        let mark = recorder.mark();
        recorder.record(TraceEntry::accepted(&config("q1", 1), &input(), 1));
        recorder.rewind(mark);
        assert_eq!(recorder.finish().len(), 2);
    }

    #[test]
    fn off_policy_never_builds_entries() {
        let mut recorder = TraceRecorder::new(RecordingPolicy::Off);
        recorder.record_with(|| unreachable!("entry built while recording is off"));
        assert!(recorder.is_empty());
    }

    #[test]
    fn entry_renders_like_a_log_line() {
        let entry = TraceEntry::initial(&config("q0", 1), &input());
        assert_eq!(entry.to_string(), "State: q0, Input: 'b', Stack: [Z]");
    }
}
