//! Solver orchestrator.
//!
//! Dispatches a board to one of three strategies: greedy backtracking,
//! best-first (A*) and MCTS. Each strategy owns the states it discovers for
//! the duration of one run.

pub mod astar;
pub mod greedy;
mod types;

use crate::error::Result;
use crate::grid::GridState;
use crate::mcts::{self, MctsConfig};

pub use astar::{a_star_search, AStarConfig, AStarSearch, OpenListOrder};
pub use greedy::{greedy_search, GreedyConfig, GreedySearch};
pub use types::{SearchOutcome, SearchReport, Strategy};

/// Holds one configuration per strategy; all search state is per-call.
#[derive(Debug, Clone, Default)]
pub struct Solver {
    greedy: GreedyConfig,
    a_star: AStarConfig,
    mcts: MctsConfig,
}

impl Solver {
    /// Create a solver with default configurations.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_greedy(mut self, config: GreedyConfig) -> Self {
        self.greedy = config;
        self
    }

    pub fn with_a_star(mut self, config: AStarConfig) -> Self {
        self.a_star = config;
        self
    }

    pub fn with_mcts(mut self, config: MctsConfig) -> Self {
        self.mcts = config;
        self
    }

    pub fn mcts_config(&self) -> &MctsConfig {
        &self.mcts
    }

    /// Check every strategy configuration up front.
    pub fn validate(&self) -> Result<()> {
        self.greedy.validate()?;
        self.mcts.validate()
    }

    /// Run `strategy` on `initial`.
    pub fn solve(&self, strategy: Strategy, initial: &GridState) -> Result<SearchReport> {
        match strategy {
            Strategy::Greedy => Ok(GreedySearch::new(self.greedy)?.run(initial)),
            Strategy::AStar => Ok(AStarSearch::new(initial, self.a_star).run()),
            Strategy::Mcts => mcts::mcts_drive_report(initial, &self.mcts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LightsOutError;

    #[test]
    fn test_invalid_configs_rejected_before_search() {
        let board: GridState = "11/10".parse().unwrap();
        let solver = Solver::new().with_greedy(GreedyConfig::default().with_max_depth(0));
        assert!(solver.validate().is_err());
        assert!(matches!(
            solver.solve(Strategy::Greedy, &board),
            Err(LightsOutError::InvalidConfiguration(_))
        ));

        let solver = Solver::new().with_mcts(MctsConfig::for_testing().with_iterations(0));
        assert!(solver.solve(Strategy::Mcts, &board).is_err());
    }

    #[test]
    fn test_dispatch_every_strategy() {
        let board: GridState = "010/111/010".parse().unwrap();
        let solver = Solver::new().with_mcts(MctsConfig::for_testing());
        for &strategy in Strategy::all() {
            let report = solver.solve(strategy, &board).unwrap();
            assert_eq!(report.outcome, SearchOutcome::Solved { moves: 1 }, "{}", strategy);
        }
    }
}
