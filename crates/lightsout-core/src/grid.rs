//! Lights Out board state.
//!
//! A [`GridState`] is an immutable `size × size` matrix of lights packed into a
//! single `u64`, bit `row * size + col` holding cell `(row, col)`. Pressing a
//! cell yields a new state; nothing here mutates a shared board, so states can
//! be used directly as keys of visited and closed sets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LightsOutError, Result};

/// Largest supported board edge; `MAX_SIZE²` cells must fit in a `u64`.
pub const MAX_SIZE: usize = 8;

/// A cell position on the board. Doubles as the MCTS action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// All positions of a `size × size` board in row-major order.
    pub fn all(size: usize) -> impl Iterator<Item = Position> {
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// An immutable Lights Out board.
///
/// Equality and hashing are structural over `(size, cells)`. Ordering is by
/// lit count first, then by size and bit pattern so that ties resolve the same
/// way on every run.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct GridState {
    size: u8,
    bits: u64,
}

impl GridState {
    /// Create an all-off board.
    pub fn new(size: usize) -> Result<Self> {
        validate_size(size)?;
        Ok(Self {
            size: size as u8,
            bits: 0,
        })
    }

    /// Create a board from rows of `0`/`1` values.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let size = rows.len();
        let mut grid = Self::new(size)?;

        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != size {
                return Err(LightsOutError::Parse(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    cells.len(),
                    size
                )));
            }
            for (col, &value) in cells.iter().enumerate() {
                match value {
                    0 => {}
                    1 => grid.bits |= 1 << (row * size + col),
                    other => {
                        return Err(LightsOutError::Parse(format!(
                            "cell ({}, {}) holds {}, expected 0 or 1",
                            row, col, other
                        )))
                    }
                }
            }
        }

        Ok(grid)
    }

    /// Create a board from its packed bit pattern.
    pub fn from_bits(size: usize, bits: u64) -> Result<Self> {
        validate_size(size)?;
        if bits & !full_mask(size) != 0 {
            return Err(LightsOutError::Parse(format!(
                "bit pattern {:#x} has bits outside a {}x{} board",
                bits, size, size
            )));
        }
        Ok(Self {
            size: size as u8,
            bits,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Packed cells, bit `row * size + col` for cell `(row, col)`.
    #[inline]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Whether the light at `pos` is on, or `None` if `pos` is off the board.
    pub fn get(&self, pos: Position) -> Option<bool> {
        self.index(pos).map(|idx| self.bits & (1 << idx) != 0)
    }

    /// Number of lights currently on.
    #[inline]
    pub fn lights_on(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// A board with every light off is solved.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.bits == 0
    }

    /// Lower bound on the presses still needed: one press changes at most five
    /// lights, so at least `ceil(lit / 5)` presses remain.
    pub fn press_lower_bound(&self) -> usize {
        self.lights_on().div_ceil(5)
    }

    /// Press the cell at `pos`, flipping it and its in-bounds orthogonal
    /// neighbours. Returns the resulting board.
    pub fn toggle(&self, pos: Position) -> Result<Self> {
        if self.index(pos).is_none() {
            return Err(LightsOutError::PositionOutOfBounds {
                row: pos.row,
                col: pos.col,
                size: self.size(),
            });
        }
        Ok(self.press(pos))
    }

    /// Press without bounds checking. Callers only pass positions produced
    /// by [`Position::all`] for this board's size.
    #[inline]
    pub(crate) fn press(&self, pos: Position) -> Self {
        Self {
            size: self.size,
            bits: self.bits ^ press_mask(self.size(), pos),
        }
    }

    /// All `size²` successor boards, one per pressed cell, in row-major order.
    pub fn possible_moves(&self) -> Vec<GridState> {
        self.positions().map(|pos| self.press(pos)).collect()
    }

    /// All positions on this board in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        Position::all(self.size())
    }

    /// Cells as rows of `0`/`1`.
    pub fn rows(&self) -> Vec<Vec<u8>> {
        let size = self.size();
        (0..size)
            .map(|row| {
                (0..size)
                    .map(|col| ((self.bits >> (row * size + col)) & 1) as u8)
                    .collect()
            })
            .collect()
    }

    /// Compact single-line form, rows separated by `/` (e.g. `11/10`).
    pub fn to_compact_string(&self) -> String {
        self.rows()
            .iter()
            .map(|row| row.iter().map(|v| if *v == 1 { '1' } else { '0' }).collect::<String>())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let size = self.size();
        (pos.row < size && pos.col < size).then(|| pos.row * size + pos.col)
    }
}

fn validate_size(size: usize) -> Result<()> {
    if size == 0 || size > MAX_SIZE {
        return Err(LightsOutError::InvalidSize { size });
    }
    Ok(())
}

fn full_mask(size: usize) -> u64 {
    let cells = size * size;
    if cells >= 64 {
        u64::MAX
    } else {
        (1u64 << cells) - 1
    }
}

fn press_mask(size: usize, pos: Position) -> u64 {
    let Position { row, col } = pos;
    let bit = |r: usize, c: usize| 1u64 << (r * size + c);

    let mut mask = bit(row, col);
    if row > 0 {
        mask |= bit(row - 1, col);
    }
    if row + 1 < size {
        mask |= bit(row + 1, col);
    }
    if col > 0 {
        mask |= bit(row, col - 1);
    }
    if col + 1 < size {
        mask |= bit(row, col + 1);
    }
    mask
}

impl Ord for GridState {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.lights_on()
            .cmp(&other.lights_on())
            .then(self.size.cmp(&other.size))
            .then(self.bits.cmp(&other.bits))
    }
}

impl PartialOrd for GridState {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows();
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

impl fmt::Debug for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GridState({})", self.to_compact_string())
    }
}

impl FromStr for GridState {
    type Err = LightsOutError;

    fn from_str(s: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for line in s.split(['/', '\n']) {
            let mut row: Vec<u8> = Vec::new();
            for ch in line.chars().filter(|c| !c.is_whitespace()) {
                match ch {
                    '0' => row.push(0),
                    '1' => row.push(1),
                    other => {
                        return Err(LightsOutError::Parse(format!(
                            "unexpected character {:?}",
                            other
                        )))
                    }
                }
            }
            if !row.is_empty() {
                rows.push(row);
            }
        }
        Self::from_rows(&rows)
    }
}

impl TryFrom<Vec<Vec<u8>>> for GridState {
    type Error = LightsOutError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl From<GridState> for Vec<Vec<u8>> {
    fn from(grid: GridState) -> Self {
        grid.rows()
    }
}
