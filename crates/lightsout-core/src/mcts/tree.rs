//! UCT tree with arena allocation.
//!
//! Nodes live in a contiguous Vec and refer to each other by [`NodeId`].

use super::node::{NodeId, UctNode};
use super::MctsState;

#[derive(Debug)]
pub struct UctTree<S: MctsState> {
    nodes: Vec<UctNode<S>>,
}

impl<S: MctsState> UctTree<S> {
    pub fn new(root_state: S) -> Self {
        Self {
            nodes: vec![UctNode::new_root(root_state)],
        }
    }

    /// Root node ID (always 0).
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &UctNode<S> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut UctNode<S> {
        &mut self.nodes[id.index()]
    }

    /// Add `node` as a child of `parent` and return its ID.
    pub fn attach(&mut self, parent: NodeId, node: UctNode<S>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.get_mut(parent).children.push(id);
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child of `id` with the highest UCB1 score.
    pub fn select_child(&self, id: NodeId, exploration_constant: f64) -> Option<NodeId> {
        let node = self.get(id);
        let parent_visits_ln = (node.visits.max(1) as f64).ln();
        node.children.iter().copied().max_by(|a, b| {
            let score_a = self.get(*a).ucb1(parent_visits_ln, exploration_constant);
            let score_b = self.get(*b).ucb1(parent_visits_ln, exploration_constant);
            score_a
                .partial_cmp(&score_b)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    /// Add one visit and `reward` to `id` and every ancestor.
    pub fn backpropagate(&mut self, id: NodeId, reward: f64) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get_mut(node_id);
            node.visits += 1;
            node.total_reward += reward;
            current = node.parent;
        }
    }

    /// Root child to play: highest settled value, ties broken by visits.
    pub fn best_root_child(&self) -> Option<NodeId> {
        self.get(self.root()).children.iter().copied().max_by(|a, b| {
            let (a, b) = (self.get(*a), self.get(*b));
            a.settled_value()
                .partial_cmp(&b.settled_value())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.is_terminal.cmp(&b.is_terminal))
                .then(a.visits.cmp(&b.visits))
        })
    }
}
