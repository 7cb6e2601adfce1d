use serde::{Deserialize, Serialize};

/// How a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// An all-off board was reached after `moves` presses.
    Solved { moves: usize },
    /// The reachable states ran out, or the strategy gave up within its
    /// bounds, without reaching an all-off board.
    Exhausted,
    /// The greedy frame stack hit its depth cap.
    DepthLimitExceeded { limit: usize },
}

impl SearchOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, SearchOutcome::Solved { .. })
    }

    /// Presses taken, or `None` for any unsolved outcome (an unbounded move
    /// count when aggregating).
    pub fn moves(&self) -> Option<usize> {
        match self {
            SearchOutcome::Solved { moves } => Some(*moves),
            _ => None,
        }
    }

    /// Short status label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            SearchOutcome::Solved { .. } => "solved",
            SearchOutcome::Exhausted => "exhausted",
            SearchOutcome::DepthLimitExceeded { .. } => "depth_limit",
        }
    }
}

impl std::fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchOutcome::Solved { moves } => write!(f, "solved in {} moves", moves),
            SearchOutcome::Exhausted => write!(f, "exhausted"),
            SearchOutcome::DepthLimitExceeded { limit } => {
                write!(f, "depth limit {} exceeded", limit)
            }
        }
    }
}

/// Outcome of a search together with its work counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    /// States expanded (moved into the visited or closed set, or MCTS
    /// engine calls)
    pub expanded: usize,
    /// Successor states produced
    pub generated: usize,
}

impl SearchReport {
    pub(crate) fn new(outcome: SearchOutcome, expanded: usize, generated: usize) -> Self {
        Self {
            outcome,
            expanded,
            generated,
        }
    }
}

/// Search strategy selectable at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Greedy,
    #[serde(rename = "astar")]
    AStar,
    Mcts,
}

impl Strategy {
    /// Get all strategies in reporting order
    pub fn all() -> &'static [Strategy] {
        &[Strategy::Greedy, Strategy::AStar, Strategy::Mcts]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Greedy => "greedy",
            Strategy::AStar => "astar",
            Strategy::Mcts => "mcts",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_moves() {
        assert_eq!(SearchOutcome::Solved { moves: 3 }.moves(), Some(3));
        assert_eq!(SearchOutcome::Exhausted.moves(), None);
        assert_eq!(SearchOutcome::DepthLimitExceeded { limit: 10 }.moves(), None);
        assert!(!SearchOutcome::Exhausted.is_solved());
    }

    #[test]
    fn test_outcome_serde_tag() {
        let json = serde_json::to_string(&SearchOutcome::Solved { moves: 2 }).unwrap();
        assert_eq!(json, r#"{"status":"solved","moves":2}"#);
        let json = serde_json::to_string(&SearchOutcome::Exhausted).unwrap();
        assert_eq!(json, r#"{"status":"exhausted"}"#);
    }

    #[test]
    fn test_strategy_names() {
        let names: Vec<&str> = Strategy::all().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["greedy", "astar", "mcts"]);
    }
}
