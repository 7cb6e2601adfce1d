//! MCTS configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LightsOutError, Result};

/// How much work a single engine call may do before it must answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchBudget {
    /// Run exactly this many select/expand/rollout/backpropagate rounds.
    Iterations(u32),
    /// Keep running rounds until this many milliseconds have elapsed.
    TimeLimitMs(u64),
}

impl SearchBudget {
    pub fn time_limit(&self) -> Option<Duration> {
        match self {
            SearchBudget::TimeLimitMs(ms) => Some(Duration::from_millis(*ms)),
            SearchBudget::Iterations(_) => None,
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, SearchBudget::Iterations(0) | SearchBudget::TimeLimitMs(0))
    }
}

/// Configuration for the UCT engine and the move-by-move drive loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Per-call budget. Treated as a hard cutoff.
    pub budget: SearchBudget,

    /// Exploration weight `c` in `Q + c * sqrt(2 ln N / n)`.
    /// The default `1/sqrt(2)` reduces this to the textbook UCB1 bonus.
    pub exploration_constant: f64,

    /// Random presses per rollout before it is scored as unsolved.
    pub max_rollout_depth: usize,

    /// Moves the drive loop may take before reporting the board exhausted.
    pub max_moves: usize,

    /// Seed for the engine's random generator; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            budget: SearchBudget::TimeLimitMs(1000),
            exploration_constant: std::f64::consts::FRAC_1_SQRT_2,
            max_rollout_depth: 100,
            max_moves: 1000,
            seed: None,
        }
    }
}

impl MctsConfig {
    /// Create a fast, deterministic config for testing.
    pub fn for_testing() -> Self {
        Self {
            budget: SearchBudget::Iterations(500),
            seed: Some(0),
            ..Self::default()
        }
    }

    /// Builder pattern: run a fixed number of iterations per call.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.budget = SearchBudget::Iterations(n);
        self
    }

    /// Builder pattern: bound each call by wall-clock time.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.budget = SearchBudget::TimeLimitMs(ms);
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Builder pattern: set the rollout depth cap.
    pub fn with_max_rollout_depth(mut self, depth: usize) -> Self {
        self.max_rollout_depth = depth;
        self
    }

    /// Builder pattern: set the drive loop's move cap.
    pub fn with_max_moves(mut self, moves: usize) -> Self {
        self.max_moves = moves;
        self
    }

    /// Builder pattern: seed the engine.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.budget.is_empty() {
            return Err(LightsOutError::config("MCTS budget must be greater than zero"));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(LightsOutError::config(format!(
                "MCTS exploration constant must be a non-negative number, got {}",
                self.exploration_constant
            )));
        }
        if self.max_moves == 0 {
            return Err(LightsOutError::config("MCTS max_moves must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.budget, SearchBudget::TimeLimitMs(1000));
        assert!((config.exploration_constant - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_iterations(100)
            .with_exploration_constant(1.5)
            .with_seed(9);

        assert_eq!(config.budget, SearchBudget::Iterations(100));
        assert!((config.exploration_constant - 1.5).abs() < 1e-12);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.budget.time_limit(), None);
    }

    #[test]
    fn test_zero_budget_rejected() {
        assert!(MctsConfig::default().with_iterations(0).validate().is_err());
        assert!(MctsConfig::default().with_time_limit_ms(0).validate().is_err());
    }

    #[test]
    fn test_bad_exploration_rejected() {
        assert!(MctsConfig::default()
            .with_exploration_constant(-1.0)
            .validate()
            .is_err());
        assert!(MctsConfig::default()
            .with_exploration_constant(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_zero_max_moves_rejected() {
        assert!(MctsConfig::for_testing().with_max_moves(0).validate().is_err());
    }
}
