use thiserror::Error;

use crate::grid::MAX_SIZE;

/// Result alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, LightsOutError>;

/// Errors raised before a search starts.
///
/// A search that runs never returns one of these: running out of states or
/// hitting a depth cap is reported through [`crate::SearchOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LightsOutError {
    #[error("invalid configuration: board size {size} is outside 1..={max}", max = MAX_SIZE)]
    InvalidSize { size: usize },

    #[error("position ({row}, {col}) is outside a {size}x{size} board")]
    PositionOutOfBounds { row: usize, col: usize, size: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("cannot parse board: {0}")]
    Parse(String),
}

impl LightsOutError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
