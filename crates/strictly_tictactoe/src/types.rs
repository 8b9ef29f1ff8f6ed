//! Core domain types for the 3x3 board.

use super::position::Position;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One of the two seats at the table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Seat {
    /// First seat.
    Player1,
    /// Second seat.
    Player2,
}

impl Seat {
    /// Returns the opposing seat.
    pub fn opponent(self) -> Self {
        match self {
            Seat::Player1 => Seat::Player2,
            Seat::Player2 => Seat::Player1,
        }
    }

    /// Picks a seat from the parity of an environment-supplied counter.
    ///
    /// Odd values seat Player1 first, even values Player2. The counter is
    /// observable by both players, so this is not a fair coin.
    pub fn from_parity(counter: u64) -> Self {
        if counter % 2 == 1 {
            Seat::Player1
        } else {
            Seat::Player2
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Square {
    /// Empty square.
    Empty,
    /// Square claimed by a seat.
    Occupied(Seat),
}

/// 3x3 board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (index = x * 3 + y).
    squares: [Square; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: Position, square: Square) {
        self.squares[pos.to_index()] = square;
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Returns all squares as a slice.
    pub fn squares(&self) -> &[Square; 9] {
        &self.squares
    }

    /// Number of occupied squares.
    pub fn filled(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// Returns the board as three rows indexed by `x`.
    pub fn rows(&self) -> Vec<Vec<Square>> {
        self.squares.chunks(3).map(|row| row.to_vec()).collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
