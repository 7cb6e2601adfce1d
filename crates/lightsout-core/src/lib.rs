//! Lights Out state model and search strategies.
//!
//! A [`GridState`] is an immutable n×n board of lights; pressing a cell flips
//! it and its orthogonal neighbours. [`Scrambler`] builds solvable starting
//! boards, and three strategies look for a sequence of presses that turns
//! every light off:
//!
//! - [`greedy_search`]: depth-first, best successor first, with backtracking
//! - [`a_star_search`]: best-first over an open list and closed set
//! - [`mcts_drive`]: one UCT search per move until the board is solved
//!
//! ```
//! use lightsout_core::{a_star_search, GridState, SearchOutcome};
//!
//! let board: GridState = "010/111/010".parse().unwrap();
//! assert_eq!(a_star_search(&board), SearchOutcome::Solved { moves: 1 });
//! ```

pub mod error;
pub mod grid;
pub mod mcts;
pub mod scrambler;
pub mod solver;


pub use error::{LightsOutError, Result};
pub use grid::{GridState, Position, MAX_SIZE};
pub use mcts::{
    drive_with_engine, mcts_drive, mcts_drive_report, MctsConfig, MctsEngine, MctsError,
    MctsState, SearchBudget, UctSearch,
};
pub use scrambler::{Scrambler, ScramblerConfig};
pub use solver::{
    a_star_search, greedy_search, AStarConfig, AStarSearch, GreedyConfig, GreedySearch,
    OpenListOrder, SearchOutcome, SearchReport, Solver, Strategy,
};
