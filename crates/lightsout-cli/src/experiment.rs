//! Trial runner and per-strategy statistics.

use std::time::Instant;

use anyhow::{Context, Result};
use lightsout_core::{GridState, Scrambler, SearchOutcome, Solver, Strategy};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ExperimentConfig;

/// One strategy run on one scrambled board.
#[derive(Debug, Clone, Serialize)]
pub struct TrialRecord {
    pub trial: usize,
    pub strategy: Strategy,
    pub size: usize,
    pub board: GridState,
    pub outcome: SearchOutcome,
    pub expanded: usize,
    pub generated: usize,
    pub elapsed_ms: f64,
}

/// Aggregated results for one strategy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyStats {
    pub strategy: Strategy,
    pub trials: usize,
    pub solved: usize,
    pub exhausted: usize,
    pub depth_limited: usize,
    pub min_moves: Option<usize>,
    pub max_moves: Option<usize>,
    pub total_moves: usize,
    pub total_elapsed_ms: f64,
}

impl StrategyStats {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            trials: 0,
            solved: 0,
            exhausted: 0,
            depth_limited: 0,
            min_moves: None,
            max_moves: None,
            total_moves: 0,
            total_elapsed_ms: 0.0,
        }
    }

    pub fn record(&mut self, record: &TrialRecord) {
        self.trials += 1;
        self.total_elapsed_ms += record.elapsed_ms;

        match record.outcome {
            SearchOutcome::Solved { moves } => {
                self.solved += 1;
                self.total_moves += moves;
                self.min_moves = Some(self.min_moves.map_or(moves, |m| m.min(moves)));
                self.max_moves = Some(self.max_moves.map_or(moves, |m| m.max(moves)));
            }
            SearchOutcome::Exhausted => self.exhausted += 1,
            SearchOutcome::DepthLimitExceeded { .. } => self.depth_limited += 1,
        }
    }

    /// Percentage of trials solved
    pub fn solve_rate(&self) -> f64 {
        if self.trials > 0 {
            self.solved as f64 / self.trials as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Mean moves over solved trials only
    pub fn mean_moves(&self) -> Option<f64> {
        if self.solved > 0 {
            Some(self.total_moves as f64 / self.solved as f64)
        } else {
            None
        }
    }

    pub fn mean_elapsed_ms(&self) -> f64 {
        if self.trials > 0 {
            self.total_elapsed_ms / self.trials as f64
        } else {
            0.0
        }
    }
}

/// Everything one experiment produced.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub size: usize,
    pub trials: usize,
    pub seed: Option<u64>,
    pub records: Vec<TrialRecord>,
    pub summary: Vec<StrategyStats>,
}

pub struct Experiment {
    config: ExperimentConfig,
    solver: Solver,
}

impl Experiment {
    /// Validate `config` and prepare the solver.
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        config.validate().context("invalid experiment configuration")?;
        let solver = config.solver();
        Ok(Self { config, solver })
    }

    /// Scramble `trials` boards and run every selected strategy on each.
    pub fn run(&self) -> Result<ExperimentReport> {
        let config = &self.config;
        let mut scrambler = match config.seed {
            Some(seed) => Scrambler::with_seed(seed),
            None => Scrambler::new(),
        }
        .configured(config.scrambler)?;

        let mut summary: Vec<StrategyStats> = config
            .strategies
            .iter()
            .map(|&s| StrategyStats::new(s))
            .collect();
        let mut records = Vec::with_capacity(config.trials * config.strategies.len());

        info!(
            size = config.size,
            trials = config.trials,
            strategies = ?config.strategies,
            "starting experiment"
        );

        for trial in 0..config.trials {
            let board = scrambler.scramble(config.size)?;
            debug!(trial, board = %board.to_compact_string(), "scrambled board");

            let solver = self.trial_solver(trial);
            for (stats, &strategy) in summary.iter_mut().zip(&config.strategies) {
                let start = Instant::now();
                let report = solver
                    .solve(strategy, &board)
                    .with_context(|| format!("{} failed on trial {}", strategy, trial))?;
                let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

                debug!(
                    trial,
                    %strategy,
                    outcome = %report.outcome,
                    expanded = report.expanded,
                    elapsed_ms,
                    "trial finished"
                );

                let record = TrialRecord {
                    trial,
                    strategy,
                    size: config.size,
                    board,
                    outcome: report.outcome,
                    expanded: report.expanded,
                    generated: report.generated,
                    elapsed_ms,
                };
                stats.record(&record);
                records.push(record);
            }
        }

        for stats in &summary {
            info!(
                strategy = %stats.strategy,
                solved = stats.solved,
                trials = stats.trials,
                solve_rate = stats.solve_rate(),
                "strategy summary"
            );
        }

        Ok(ExperimentReport {
            size: config.size,
            trials: config.trials,
            seed: config.seed,
            records,
            summary,
        })
    }

    /// Seeded experiments give every trial its own MCTS seed so runs repeat.
    fn trial_solver(&self, trial: usize) -> Solver {
        match self.config.seed {
            Some(seed) => {
                let mcts = self
                    .solver
                    .mcts_config()
                    .clone()
                    .with_seed(seed.wrapping_add(trial as u64));
                self.solver.clone().with_mcts(mcts)
            }
            None => self.solver.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightsout_core::{MctsConfig, ScramblerConfig};

    fn small_config() -> ExperimentConfig {
        ExperimentConfig {
            size: 3,
            trials: 4,
            seed: Some(11),
            scrambler: ScramblerConfig::default().with_presses(1, 3),
            mcts: MctsConfig::for_testing().with_iterations(1000),
            ..Default::default()
        }
    }

    fn record(strategy: Strategy, outcome: SearchOutcome) -> TrialRecord {
        TrialRecord {
            trial: 0,
            strategy,
            size: 2,
            board: GridState::new(2).unwrap(),
            outcome,
            expanded: 0,
            generated: 0,
            elapsed_ms: 2.0,
        }
    }

    #[test]
    fn test_stats_track_outcomes() {
        let mut stats = StrategyStats::new(Strategy::Greedy);
        assert_eq!(stats.solve_rate(), 0.0);
        assert_eq!(stats.mean_moves(), None);

        stats.record(&record(Strategy::Greedy, SearchOutcome::Solved { moves: 3 }));
        stats.record(&record(Strategy::Greedy, SearchOutcome::Solved { moves: 7 }));
        stats.record(&record(Strategy::Greedy, SearchOutcome::Exhausted));
        stats.record(&record(
            Strategy::Greedy,
            SearchOutcome::DepthLimitExceeded { limit: 5 },
        ));

        assert_eq!(stats.trials, 4);
        assert_eq!(stats.solved, 2);
        assert_eq!(stats.exhausted, 1);
        assert_eq!(stats.depth_limited, 1);
        assert_eq!(stats.min_moves, Some(3));
        assert_eq!(stats.max_moves, Some(7));
        assert_eq!(stats.mean_moves(), Some(5.0));
        assert!((stats.solve_rate() - 50.0).abs() < 1e-9);
        assert!((stats.mean_elapsed_ms() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_records_every_strategy_per_trial() {
        let report = Experiment::new(small_config()).unwrap().run().unwrap();
        assert_eq!(report.records.len(), 4 * 3);
        assert_eq!(report.summary.len(), 3);

        for stats in &report.summary {
            assert_eq!(stats.trials, 4);
            assert_eq!(stats.solved, 4, "{}", stats.strategy);
        }

        // Every strategy sees the same board within a trial
        for chunk in report.records.chunks(3) {
            assert!(chunk.iter().all(|r| r.board == chunk[0].board));
            assert!(chunk.iter().all(|r| r.trial == chunk[0].trial));
        }
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let a = Experiment::new(small_config()).unwrap().run().unwrap();
        let b = Experiment::new(small_config()).unwrap().run().unwrap();
        let outcomes = |r: &ExperimentReport| {
            r.records
                .iter()
                .map(|rec| (rec.board, rec.outcome))
                .collect::<Vec<_>>()
        };
        assert_eq!(outcomes(&a), outcomes(&b));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExperimentConfig {
            trials: 0,
            ..small_config()
        };
        assert!(Experiment::new(config).is_err());
    }
}
