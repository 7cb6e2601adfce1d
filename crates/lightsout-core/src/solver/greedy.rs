//! Greedy best-first search with backtracking.
//!
//! Depth-first over an explicit frame stack. Each frame ranks its successors by
//! how many lights they turn off and tries them in that order; a frame whose
//! successors are used up is popped and its parent moves on to the next
//! candidate. One visited set spans the whole search, so no board is expanded
//! twice even across sibling branches.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::{SearchOutcome, SearchReport};
use crate::error::{LightsOutError, Result};
use crate::grid::GridState;

/// Default cap on the frame stack depth.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Configuration for the greedy search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreedyConfig {
    /// Deepest frame stack allowed before the search gives up with
    /// [`SearchOutcome::DepthLimitExceeded`].
    pub max_depth: usize,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl GreedyConfig {
    /// Builder pattern: set the depth cap.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(LightsOutError::config("greedy max_depth must be at least 1"));
        }
        Ok(())
    }
}

/// One level of the search: a board, the presses that led to it, and its
/// ranked successors with a cursor to the next one to try.
struct Frame {
    moves: usize,
    ranked: Vec<GridState>,
    cursor: usize,
}

impl Frame {
    fn expand(state: &GridState, moves: usize) -> Self {
        Self {
            moves,
            ranked: rank_successors(state),
            cursor: 0,
        }
    }

    fn next_unvisited(&mut self, visited: &HashSet<GridState>) -> Option<GridState> {
        while let Some(candidate) = self.ranked.get(self.cursor).copied() {
            self.cursor += 1;
            if !visited.contains(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

/// Successors ordered by change in lit count, largest reduction first. The
/// sort is stable, so ties stay in row-major press order.
pub(crate) fn rank_successors(state: &GridState) -> Vec<GridState> {
    let lit = state.lights_on() as isize;
    let mut successors = state.possible_moves();
    successors.sort_by_key(|next| next.lights_on() as isize - lit);
    successors
}

/// Greedy backtracking searcher.
#[derive(Debug, Clone, Default)]
pub struct GreedySearch {
    config: GreedyConfig,
}

impl GreedySearch {
    pub fn new(config: GreedyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GreedyConfig {
        &self.config
    }

    /// Search from `initial` until an all-off board is found, every reachable
    /// board has been visited, or the depth cap is hit.
    pub fn run(&self, initial: &GridState) -> SearchReport {
        let report = self.search(initial);
        debug!(
            strategy = "greedy",
            size = initial.size(),
            outcome = %report.outcome,
            expanded = report.expanded,
            generated = report.generated,
            "search finished"
        );
        report
    }

    fn search(&self, initial: &GridState) -> SearchReport {
        if initial.is_terminal() {
            return SearchReport::new(SearchOutcome::Solved { moves: 0 }, 0, 0);
        }

        let branching = initial.size() * initial.size();
        let mut visited = HashSet::new();
        visited.insert(*initial);
        let mut stack = vec![Frame::expand(initial, 0)];
        let mut expanded = 1;
        let mut generated = branching;

        while let Some(frame) = stack.last_mut() {
            let Some(next) = frame.next_unvisited(&visited) else {
                stack.pop();
                continue;
            };
            let moves = frame.moves + 1;
            visited.insert(next);

            if next.is_terminal() {
                return SearchReport::new(SearchOutcome::Solved { moves }, expanded, generated);
            }

            if stack.len() >= self.config.max_depth {
                warn!(
                    limit = self.config.max_depth,
                    visited = visited.len(),
                    "greedy search hit its depth limit"
                );
                return SearchReport::new(
                    SearchOutcome::DepthLimitExceeded {
                        limit: self.config.max_depth,
                    },
                    expanded,
                    generated,
                );
            }

            stack.push(Frame::expand(&next, moves));
            expanded += 1;
            generated += branching;
        }

        SearchReport::new(SearchOutcome::Exhausted, expanded, generated)
    }
}

/// Greedy backtracking search with the default depth cap.
pub fn greedy_search(initial: &GridState) -> SearchOutcome {
    GreedySearch::default().run(initial).outcome
}
