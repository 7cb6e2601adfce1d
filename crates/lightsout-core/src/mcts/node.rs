//! UCT tree node.

use super::MctsState;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the UCT tree: a state, the action that produced it, and the
/// statistics accumulated by backpropagation.
#[derive(Debug, Clone)]
pub struct UctNode<S: MctsState> {
    pub state: S,

    /// Parent node (None for root)
    pub parent: Option<NodeId>,

    /// Action taken from the parent to reach this node (None for root)
    pub action: Option<S::Action>,

    pub children: Vec<NodeId>,

    /// Actions not yet expanded into children
    pub untried: Vec<S::Action>,

    pub visits: u32,

    /// Sum of rewards backpropagated through this node
    pub total_reward: f64,

    pub is_terminal: bool,
}

impl<S: MctsState> UctNode<S> {
    pub fn new_root(state: S) -> Self {
        Self::build(state, None, None)
    }

    pub fn new_child(parent: NodeId, action: S::Action, state: S) -> Self {
        Self::build(state, Some(parent), Some(action))
    }

    fn build(state: S, parent: Option<NodeId>, action: Option<S::Action>) -> Self {
        let is_terminal = state.is_terminal();
        let untried = if is_terminal {
            Vec::new()
        } else {
            state.possible_actions()
        };
        Self {
            state,
            parent,
            action,
            children: Vec::new(),
            untried,
            visits: 0,
            total_reward: 0.0,
            is_terminal,
        }
    }

    /// Mean reward, 0.0 if never visited.
    #[inline]
    pub fn mean_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }

    /// UCB1 score: `Q + c * sqrt(2 ln N / n)`. Unvisited nodes score infinity.
    #[inline]
    pub fn ucb1(&self, parent_visits_ln: f64, exploration_constant: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let exploration = (2.0 * parent_visits_ln / self.visits as f64).sqrt();
        self.mean_reward() + exploration_constant * exploration
    }

    /// Value used to pick the final action: the exact reward for terminal
    /// nodes, the sampled mean otherwise.
    pub fn settled_value(&self) -> f64 {
        if self.is_terminal {
            self.state.reward()
        } else {
            self.mean_reward()
        }
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }
}
