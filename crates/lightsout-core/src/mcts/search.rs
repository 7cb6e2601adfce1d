//! UCT search engine.
//!
//! Each iteration runs the four MCTS phases:
//! 1. Selection: descend through fully expanded nodes by UCB1
//! 2. Expansion: add one untried action, chosen at random, as a new child
//! 3. Simulation: press random cells until the board is solved or the rollout
//!    depth cap is reached
//! 4. Backpropagation: add the rollout reward along the path to the root

use std::marker::PhantomData;
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::trace;

use super::config::{MctsConfig, SearchBudget};
use super::node::{NodeId, UctNode};
use super::tree::UctTree;
use super::{MctsEngine, MctsState};
use crate::error::Result;

/// Reasons an engine call produced no action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MctsError {
    #[error("state is already terminal")]
    TerminalState,

    #[error("state offers no actions")]
    NoActions,

    #[error("budget ran out before any action was explored")]
    Unexplored,
}

/// Statistics of the most recent engine call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchStats {
    pub iterations: u32,
    pub tree_size: usize,
    pub root_visits: u32,
    pub elapsed: Duration,
}

/// UCT engine over any [`MctsState`].
pub struct UctSearch<S> {
    config: MctsConfig,
    rng: ChaCha8Rng,
    last_stats: SearchStats,
    _state: PhantomData<fn(S)>,
}

impl<S: MctsState> UctSearch<S> {
    pub fn new(config: MctsConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            config,
            rng,
            last_stats: SearchStats::default(),
            _state: PhantomData,
        })
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn last_stats(&self) -> SearchStats {
        self.last_stats
    }

    /// Search from `root` under the configured budget and return the action
    /// of the best root child.
    pub fn search(&mut self, root: &S) -> std::result::Result<S::Action, MctsError> {
        if root.is_terminal() {
            return Err(MctsError::TerminalState);
        }

        let mut tree = UctTree::new(root.clone());
        if tree.get(tree.root()).untried.is_empty() {
            return Err(MctsError::NoActions);
        }

        let start = Instant::now();
        let mut iterations = 0u32;
        while self.has_budget(iterations, start) {
            let leaf = self.select_and_expand(&mut tree);
            let reward = self.rollout(&tree.get(leaf).state);
            tree.backpropagate(leaf, reward);
            iterations += 1;
        }

        self.last_stats = SearchStats {
            iterations,
            tree_size: tree.len(),
            root_visits: tree.get(tree.root()).visits,
            elapsed: start.elapsed(),
        };

        let best = tree.best_root_child().ok_or(MctsError::Unexplored)?;
        let node = tree.get(best);
        trace!(
            iterations,
            tree_size = tree.len(),
            visits = node.visits,
            value = node.settled_value(),
            "selected root child"
        );
        node.action.clone().ok_or(MctsError::Unexplored)
    }

    fn has_budget(&self, iterations: u32, start: Instant) -> bool {
        match self.config.budget {
            SearchBudget::Iterations(limit) => iterations < limit,
            SearchBudget::TimeLimitMs(ms) => start.elapsed() < Duration::from_millis(ms),
        }
    }

    fn select_and_expand(&mut self, tree: &mut UctTree<S>) -> NodeId {
        let mut current = tree.root();
        loop {
            let node = tree.get(current);
            if node.is_terminal {
                return current;
            }
            if !node.is_fully_expanded() {
                return self.expand(tree, current);
            }
            match tree.select_child(current, self.config.exploration_constant) {
                Some(child) => current = child,
                None => return current,
            }
        }
    }

    fn expand(&mut self, tree: &mut UctTree<S>, id: NodeId) -> NodeId {
        let node = tree.get_mut(id);
        let pick = self.rng.gen_range(0..node.untried.len());
        let action = node.untried.swap_remove(pick);
        let state = node.state.take_action(&action);
        tree.attach(id, UctNode::new_child(id, action, state))
    }

    fn rollout(&mut self, from: &S) -> f64 {
        let mut state = from.clone();
        for _ in 0..self.config.max_rollout_depth {
            if state.is_terminal() {
                break;
            }
            let actions = state.possible_actions();
            if actions.is_empty() {
                break;
            }
            let action = &actions[self.rng.gen_range(0..actions.len())];
            state = state.take_action(action);
        }

        if state.is_terminal() {
            state.reward()
        } else {
            0.0
        }
    }
}

impl<S: MctsState> MctsEngine<S> for UctSearch<S> {
    fn search(&mut self, state: &S) -> std::result::Result<S::Action, MctsError> {
        UctSearch::search(self, state)
    }
}
