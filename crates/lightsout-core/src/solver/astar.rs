//! Best-first search over an open list and a closed set.
//!
//! By default the open list is ordered by lit count alone, so the result is
//! not guaranteed to be a minimum-move solution. [`OpenListOrder::StepsPlusBound`]
//! orders by presses taken plus an admissible lower bound instead, which makes
//! the returned move count minimal.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::types::{SearchOutcome, SearchReport};
use crate::grid::GridState;

/// Priority used to pick the next open state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenListOrder {
    /// Fewest lit cells first, ties in discovery order
    #[default]
    LitCount,
    /// Lowest `steps + ceil(lit / 5)` first, ties by fewer lit cells then
    /// discovery order
    StepsPlusBound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AStarConfig {
    pub order: OpenListOrder,
}

impl AStarConfig {
    /// Builder pattern: set the open-list order.
    pub fn with_order(mut self, order: OpenListOrder) -> Self {
        self.order = order;
        self
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    priority: (usize, usize),
    seq: u64,
    steps: usize,
    state: GridState,
}

/// Incremental best-first search. Drive it with [`AStarSearch::step`] or run
/// it to completion with [`AStarSearch::run`].
pub struct AStarSearch {
    config: AStarConfig,
    open: BinaryHeap<Reverse<OpenEntry>>,
    /// Steps of the live open entry for each queued state
    queued: HashMap<GridState, usize>,
    closed: HashSet<GridState>,
    seq: u64,
    generated: usize,
    outcome: Option<SearchOutcome>,
}

impl AStarSearch {
    pub fn new(initial: &GridState, config: AStarConfig) -> Self {
        let mut search = Self {
            config,
            open: BinaryHeap::new(),
            queued: HashMap::new(),
            closed: HashSet::new(),
            seq: 0,
            generated: 0,
            outcome: None,
        };
        search.enqueue(*initial, 0);
        search
    }

    /// Number of expanded states.
    pub fn closed_len(&self) -> usize {
        self.closed.len()
    }

    /// Number of states waiting in the open list.
    pub fn open_len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_closed(&self, state: &GridState) -> bool {
        self.closed.contains(state)
    }

    pub fn outcome(&self) -> Option<SearchOutcome> {
        self.outcome
    }

    /// Run one loop iteration: pop the best open state and either finish on
    /// it or expand it. Returns the outcome once the search is over.
    pub fn step(&mut self) -> Option<SearchOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }

        let entry = loop {
            let Some(Reverse(entry)) = self.open.pop() else {
                return self.finish(SearchOutcome::Exhausted);
            };
            // Entries superseded by a shorter path are skipped
            if self.queued.get(&entry.state) == Some(&entry.steps) {
                self.queued.remove(&entry.state);
                break entry;
            }
        };

        if entry.state.is_terminal() {
            return self.finish(SearchOutcome::Solved { moves: entry.steps });
        }

        self.closed.insert(entry.state);
        trace!(
            steps = entry.steps,
            lit = entry.state.lights_on(),
            closed = self.closed.len(),
            "expanding"
        );

        let steps = entry.steps + 1;
        for next in entry.state.possible_moves() {
            self.generated += 1;
            if self.closed.contains(&next) {
                continue;
            }
            match self.queued.get(&next).copied() {
                None => self.enqueue(next, steps),
                Some(queued_steps)
                    if self.config.order == OpenListOrder::StepsPlusBound
                        && steps < queued_steps =>
                {
                    self.enqueue(next, steps)
                }
                Some(_) => {}
            }
        }

        None
    }

    /// Step until the search finishes.
    pub fn run(mut self) -> SearchReport {
        let outcome = loop {
            if let Some(outcome) = self.step() {
                break outcome;
            }
        };
        let report = SearchReport::new(outcome, self.closed.len(), self.generated);
        debug!(
            strategy = "astar",
            order = ?self.config.order,
            outcome = %report.outcome,
            expanded = report.expanded,
            generated = report.generated,
            "search finished"
        );
        report
    }

    fn enqueue(&mut self, state: GridState, steps: usize) {
        let priority = match self.config.order {
            OpenListOrder::LitCount => (state.lights_on(), 0),
            OpenListOrder::StepsPlusBound => (steps + state.press_lower_bound(), state.lights_on()),
        };
        self.open.push(Reverse(OpenEntry {
            priority,
            seq: self.seq,
            steps,
            state,
        }));
        self.seq += 1;
        self.queued.insert(state, steps);
    }

    fn finish(&mut self, outcome: SearchOutcome) -> Option<SearchOutcome> {
        self.outcome = Some(outcome);
        Some(outcome)
    }
}

/// Best-first search ordered by lit count.
pub fn a_star_search(initial: &GridState) -> SearchOutcome {
    AStarSearch::new(initial, AStarConfig::default()).run().outcome
}
