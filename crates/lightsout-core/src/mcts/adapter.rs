use super::MctsState;
use crate::grid::{GridState, Position};

impl MctsState for GridState {
    type Action = Position;

    /// Every cell, solved board or not.
    fn possible_actions(&self) -> Vec<Position> {
        self.positions().collect()
    }

    fn take_action(&self, action: &Position) -> GridState {
        self.press(*action)
    }

    fn is_terminal(&self) -> bool {
        GridState::is_terminal(self)
    }

    fn reward(&self) -> f64 {
        if GridState::is_terminal(self) {
            1.0
        } else {
            0.0
        }
    }
}
