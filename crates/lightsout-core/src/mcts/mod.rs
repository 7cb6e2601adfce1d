//! Monte Carlo Tree Search over Lights Out boards.
//!
//! Any engine can drive a board as long as the board exposes the
//! [`MctsState`] capability set: enumerate actions, apply one without mutating
//! the receiver, report whether it is terminal, and score a terminal state.
//! [`GridState`] implements it in `adapter`, and [`UctSearch`] is the bundled
//! engine. [`mcts_drive`] plays a board move by move, asking the engine for
//! one action at a time until the lights are out.
//!
//! ```text
//!   GridState ──MctsState──► MctsEngine::search ──Action──► take_action ─┐
//!       ▲                                                                │
//!       └────────────────────────── until terminal ◄─────────────────────┘
//! ```

mod adapter;
pub mod config;
pub mod node;
pub mod search;
pub mod tree;

use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::error::Result;
use crate::grid::GridState;
use crate::solver::{SearchOutcome, SearchReport};

pub use config::{MctsConfig, SearchBudget};
pub use node::{NodeId, UctNode};
pub use search::{MctsError, SearchStats, UctSearch};
pub use tree::UctTree;

/// Capabilities a state must offer to be searched by an MCTS engine.
pub trait MctsState: Clone {
    type Action: Clone + Eq + Hash + Debug;

    /// Every action legal from this state.
    fn possible_actions(&self) -> Vec<Self::Action>;

    /// The state reached by taking `action`. The receiver is unchanged.
    fn take_action(&self, action: &Self::Action) -> Self;

    fn is_terminal(&self) -> bool;

    /// Reward of a terminal state. Engines only call this on terminal states.
    fn reward(&self) -> f64;
}

/// An MCTS engine: given a state, pick the action to take from it.
pub trait MctsEngine<S: MctsState> {
    fn search(&mut self, state: &S) -> std::result::Result<S::Action, MctsError>;
}

/// Solve `initial` move by move with the bundled UCT engine.
///
/// The configuration is validated before any search. An engine call that
/// yields no action, or running past `max_moves`, ends the drive as
/// [`SearchOutcome::Exhausted`].
pub fn mcts_drive(initial: &GridState, config: &MctsConfig) -> Result<SearchOutcome> {
    Ok(mcts_drive_report(initial, config)?.outcome)
}

/// Like [`mcts_drive`], returning the number of engine calls as `expanded`.
pub fn mcts_drive_report(initial: &GridState, config: &MctsConfig) -> Result<SearchReport> {
    let mut engine = UctSearch::new(config.clone())?;
    let report = drive_with_engine(initial, &mut engine, config.max_moves);
    debug!(
        strategy = "mcts",
        size = initial.size(),
        budget = ?config.budget,
        outcome = %report.outcome,
        engine_calls = report.expanded,
        "search finished"
    );
    Ok(report)
}

/// Drive `initial` to a terminal state with any engine, taking at most
/// `max_moves` actions.
pub fn drive_with_engine<S, E>(initial: &S, engine: &mut E, max_moves: usize) -> SearchReport
where
    S: MctsState,
    E: MctsEngine<S>,
{
    let mut state = initial.clone();
    let mut moves = 0;
    let mut calls = 0;

    while !state.is_terminal() {
        if moves >= max_moves {
            debug!(max_moves, "move cap reached before the board was solved");
            return SearchReport::new(SearchOutcome::Exhausted, calls, moves);
        }

        calls += 1;
        match engine.search(&state) {
            Ok(action) => {
                state = state.take_action(&action);
                moves += 1;
                trace!(moves, ?action, "took action");
            }
            Err(err) => {
                debug!(moves, error = %err, "engine returned no action");
                return SearchReport::new(SearchOutcome::Exhausted, calls, moves);
            }
        }
    }

    SearchReport::new(SearchOutcome::Solved { moves }, calls, moves)
}
