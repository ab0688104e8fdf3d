//! Exhaustive backtracking search.
//!
//! From each configuration the engine first checks for acceptance, then tries every
//! epsilon move, then every move consuming the next input symbol, descending into each and
//! stopping at the first branch that accepts. Each branch carries its own persistent stack.
//!
//! Termination comes from the depth bound: a configuration deeper than `max_depth` simply
//! fails. With [`CyclePolicy::PruneRepeats`] a branch also fails as soon as its
//! configuration already appears on the path that led to it. The current path lives in a
//! heap-allocated frame stack, so large bounds cost memory, not native stack.

use im::HashSet;
use serde::{Deserialize, Serialize};

use super::{Executor, Outcome, RunStats, Verdict};
use crate::model::{tokenize, Configuration, Pda, Symbol, Transition};
use crate::trace::{RecordingPolicy, TraceEntry, TraceRecorder};

pub const DEFAULT_MAX_DEPTH: usize = 1000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CyclePolicy {
    /// Rely on the depth bound alone.
    #[default]
    DepthBound,
    /// Also fail configurations that repeat one of their ancestors.
    PruneRepeats,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_depth: usize,
    pub cycle_policy: CyclePolicy,
    pub recording: RecordingPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            cycle_policy: CyclePolicy::default(),
            recording: RecordingPolicy::default(),
        }
    }
}

impl SearchConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_cycle_policy(mut self, cycle_policy: CyclePolicy) -> Self {
        self.cycle_policy = cycle_policy;
        self
    }

    pub fn with_recording(mut self, recording: RecordingPolicy) -> Self {
        self.recording = recording;
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Acceptance only; nothing is recorded regardless of the configured policy.
    pub fn accepts(&self, pda: &Pda, input: &str) -> bool {
        self.search(pda, input, RecordingPolicy::Off).is_accepted()
    }

    /// Acceptance plus a trace recorded under the configured policy.
    pub fn run(&self, pda: &Pda, input: &str) -> Outcome {
        self.search(pda, input, self.config.recording)
    }

    fn search(&self, pda: &Pda, input: &str, recording: RecordingPolicy) -> Outcome {
        let symbols = tokenize(input);
        let mut search = Search {
            pda,
            input: &symbols,
            config: &self.config,
            recorder: TraceRecorder::new(recording),
            stats: RunStats::default(),
        };

        let initial = pda.initial_configuration();
        search
            .recorder
            .record(TraceEntry::initial(&initial, &symbols));
        let accepted = search.explore(initial);

        let Search {
            recorder, stats, ..
        } = search;
        tracing::debug!(
            input,
            accepted,
            explored = stats.explored,
            deepest = stats.deepest,
            depth_limit_hits = stats.depth_limit_hits,
            pruned_repeats = stats.pruned_repeats,
            "search finished"
        );

        let message = (!accepted && stats.depth_limit_hits > 0).then(|| {
            format!(
                "depth limit of {} reached {} time(s); the verdict covers only the explored part",
                self.config.max_depth, stats.depth_limit_hits
            )
        });

        Outcome {
            engine: self.name(),
            input: input.to_string(),
            verdict: Verdict::from(accepted),
            trace: recorder.finish(),
            stats,
            message,
        }
    }
}

impl Executor for SearchEngine {
    fn name(&self) -> &'static str {
        "search"
    }

    fn execute(&self, pda: &Pda, input: &str) -> Outcome {
        self.run(pda, input)
    }

    fn accepts(&self, pda: &Pda, input: &str) -> bool {
        SearchEngine::accepts(self, pda, input)
    }
}

/// State of one search request.
struct Search<'a> {
    pda: &'a Pda,
    input: &'a [Symbol],
    config: &'a SearchConfig,
    recorder: TraceRecorder,
    stats: RunStats,
}

/// A move still to try from a frame: the transition and the symbol it consumes.
type Move<'a> = (&'a Transition, Option<&'a Symbol>);

/// One configuration on the current root-to-node path.
struct Frame<'a> {
    config: Configuration,
    depth: usize,
    ancestors: HashSet<Configuration>,
    moves: std::vec::IntoIter<Move<'a>>,
    /// Recorder position before this frame's entry, restored when the frame fails.
    mark: usize,
}

enum Visit<'a> {
    Accepted,
    Open(Frame<'a>),
}

impl<'a> Search<'a> {
    /// Depth-first search driven from an explicit frame stack, so the depth bound is the
    /// only limit on how deep a branch goes.
    fn explore(&mut self, initial: Configuration) -> bool {
        let Some(ancestors) = self.admit(&initial, 0, &HashSet::new()) else {
            return false;
        };
        let mark = self.recorder.mark();
        let mut frames = match self.open(initial, 0, ancestors, mark) {
            Visit::Accepted => return true,
            Visit::Open(frame) => vec![frame],
        };

        while let Some(frame) = frames.last_mut() {
            let Some((transition, consumed)) = frame.moves.next() else {
                if let Some(failed) = frames.pop() {
                    self.recorder.rewind(failed.mark);
                }
                continue;
            };

            let (stack, ops) = transition.apply_to(&frame.config.stack);
            let next = Configuration {
                state: transition.to.clone(),
                cursor: frame.config.cursor + usize::from(consumed.is_some()),
                stack,
            };
            let depth = frame.depth + 1;
            let Some(ancestors) = self.admit(&next, depth, &frame.ancestors) else {
                continue;
            };

            let input = self.input;
            let mark = self.recorder.mark();
            self.recorder.record_with(|| {
                TraceEntry::moved(&next, transition, &ops, consumed, input, depth)
            });
            match self.open(next, depth, ancestors, mark) {
                Visit::Accepted => return true,
                Visit::Open(child) => frames.push(child),
            }
        }
        false
    }

    /// Applies the depth bound and the cycle policy. Returns the path set the
    /// configuration's children see, or `None` when the branch is cut off.
    fn admit(
        &mut self,
        config: &Configuration,
        depth: usize,
        ancestors: &HashSet<Configuration>,
    ) -> Option<HashSet<Configuration>> {
        if depth > self.config.max_depth {
            self.stats.depth_limit_hits += 1;
            tracing::trace!(depth, state = %config.state, "depth limit reached");
            return None;
        }
        match self.config.cycle_policy {
            CyclePolicy::DepthBound => Some(ancestors.clone()),
            CyclePolicy::PruneRepeats if ancestors.contains(config) => {
                self.stats.pruned_repeats += 1;
                tracing::trace!(depth, state = %config.state, "repeated configuration");
                None
            }
            CyclePolicy::PruneRepeats => Some(ancestors.update(config.clone())),
        }
    }

    /// Accept check, then the moves to try: epsilon moves first, then consuming ones.
    fn open(
        &mut self,
        config: Configuration,
        depth: usize,
        ancestors: HashSet<Configuration>,
        mark: usize,
    ) -> Visit<'a> {
        self.stats.explored += 1;
        self.stats.deepest = self.stats.deepest.max(depth);

        let input = self.input;
        if config.cursor == input.len() && self.pda.is_accepting(&config.state) {
            self.recorder
                .record_with(|| TraceEntry::accepted(&config, input, depth));
            return Visit::Accepted;
        }

        let pda = self.pda;
        let next = input.get(config.cursor);
        let candidates = pda
            .table()
            .lookup(&config.state, next, config.stack.top());
        let mut moves: Vec<Move<'a>> = candidates.epsilon.iter().map(|t| (*t, None)).collect();
        if let Some(symbol) = next {
            moves.extend(candidates.consuming.iter().map(|t| (*t, Some(symbol))));
        }

        Visit::Open(Frame {
            config,
            depth,
            ancestors,
            moves: moves.into_iter(),
            mark,
        })
    }
}
