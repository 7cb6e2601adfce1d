use crate::error::{LightsOutError, Result};
use crate::grid::{GridState, Position};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Configuration for board scrambling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScramblerConfig {
    /// Fewest random presses applied to the solved board
    pub min_presses: usize,
    /// Most random presses applied to the solved board
    pub max_presses: usize,
}

impl Default for ScramblerConfig {
    fn default() -> Self {
        Self {
            min_presses: 4,
            max_presses: 15,
        }
    }
}

impl ScramblerConfig {
    /// Builder pattern: set the press range.
    pub fn with_presses(mut self, min: usize, max: usize) -> Self {
        self.min_presses = min;
        self.max_presses = max;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_presses > self.max_presses {
            return Err(LightsOutError::config(format!(
                "scrambler min_presses ({}) exceeds max_presses ({})",
                self.min_presses, self.max_presses
            )));
        }
        Ok(())
    }
}

/// Produces solvable starting boards by pressing random cells of a solved
/// board. Every press is undone by pressing the same cell again, so the
/// result can always be solved.
pub struct Scrambler {
    config: ScramblerConfig,
    rng: ChaCha8Rng,
}

impl Default for Scrambler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrambler {
    /// Create a scrambler with default configuration, seeded from entropy
    pub fn new() -> Self {
        Self {
            config: ScramblerConfig::default(),
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Create a scrambler with custom configuration
    pub fn with_config(config: ScramblerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha8Rng::from_entropy(),
        })
    }

    /// Create a scrambler with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: ScramblerConfig::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Builder pattern: replace the configuration, keeping the generator.
    pub fn configured(mut self, config: ScramblerConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &ScramblerConfig {
        &self.config
    }

    /// Scramble a `size × size` board with a random number of presses drawn
    /// from the configured range.
    pub fn scramble(&mut self, size: usize) -> Result<GridState> {
        let presses = self
            .rng
            .gen_range(self.config.min_presses..=self.config.max_presses);
        self.scramble_with_presses(size, presses)
    }

    /// Scramble a board with exactly `presses` random presses. Cells are
    /// drawn with replacement, so later presses may undo earlier ones.
    pub fn scramble_with_presses(&mut self, size: usize, presses: usize) -> Result<GridState> {
        let mut grid = GridState::new(size)?;
        for _ in 0..presses {
            let pos = Position::new(self.rng.gen_range(0..size), self.rng.gen_range(0..size));
            grid = grid.press(pos);
        }
        tracing::trace!(size, presses, board = %grid.to_compact_string(), "scrambled board");
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScramblerConfig::default();
        assert_eq!(config.min_presses, 4);
        assert_eq!(config.max_presses, 15);
        assert!(config.validate().is_ok());
        assert_eq!(Scrambler::with_seed(1).config(), &config);
    }

    #[test]
    fn test_configured_keeps_new_range() {
        let config = ScramblerConfig::default().with_presses(2, 2);
        let mut scrambler = Scrambler::with_seed(5).configured(config).unwrap();
        assert_eq!(scrambler.config(), &config);
        // Two presses light at most ten cells
        assert!(scrambler.scramble(5).unwrap().lights_on() <= 10);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let config = ScramblerConfig::default().with_presses(6, 5);
        assert!(matches!(
            Scrambler::with_config(config),
            Err(LightsOutError::InvalidConfiguration(_))
        ));
        assert!(Scrambler::with_seed(1).configured(config).is_err());
    }

    #[test]
    fn test_invalid_size_rejected() {
        let mut scrambler = Scrambler::with_seed(1);
        assert_eq!(
            scrambler.scramble(0),
            Err(LightsOutError::InvalidSize { size: 0 })
        );
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut a = Scrambler::with_seed(42);
        let mut b = Scrambler::with_seed(42);
        for _ in 0..10 {
            assert_eq!(a.scramble(4).unwrap(), b.scramble(4).unwrap());
        }
    }

    #[test]
    fn test_zero_presses_is_solved() {
        let mut scrambler = Scrambler::with_seed(7);
        let grid = scrambler.scramble_with_presses(3, 0).unwrap();
        assert!(grid.is_terminal());
    }

    #[test]
    fn test_single_press_lights_a_cross() {
        let mut scrambler = Scrambler::with_seed(7);
        let grid = scrambler.scramble_with_presses(5, 1).unwrap();
        assert!((3..=5).contains(&grid.lights_on()));
    }

    #[test]
    fn test_scramble_keeps_size() {
        let mut scrambler = Scrambler::with_seed(3);
        for size in 1..=5 {
            assert_eq!(scrambler.scramble(size).unwrap().size(), size);
        }
    }
}
