//! Outcomes and winning lines of a finished round.

use super::{Position, Seat};
use serde::{Deserialize, Serialize};

/// A line of three cells that wins the round when owned by one seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum Line {
    /// All cells with the given `x`.
    #[display("row {_0}")]
    Row(u8),
    /// All cells with the given `y`.
    #[display("column {_0}")]
    Column(u8),
    /// Cells with x == y.
    #[display("main diagonal")]
    Diagonal,
    /// Cells with x + y == 2.
    #[display("anti-diagonal")]
    AntiDiagonal,
}

impl Line {
    /// Cells making up the line. A row or column index off the board yields
    /// no cells.
    pub fn cells(self) -> Vec<Position> {
        (0..3u8)
            .filter_map(|i| match self {
                Line::Row(x) => Position::new(x, i).ok(),
                Line::Column(y) => Position::new(i, y).ok(),
                Line::Diagonal => Position::new(i, i).ok(),
                Line::AntiDiagonal => Position::new(i, 2 - i).ok(),
            })
            .collect()
    }
}

/// Outcome of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A seat completed a line.
    Winner {
        /// The winning seat.
        seat: Seat,
        /// The line it completed.
        line: Line,
    },
    /// The board filled up with no line.
    Draw,
    /// Play stopped before a result; settles like a draw.
    Abandoned,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Seat> {
        match self {
            Outcome::Winner { seat, .. } => Some(*seat),
            Outcome::Draw | Outcome::Abandoned => None,
        }
    }

    /// Returns true if the pot is split.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw | Outcome::Abandoned)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner { seat, line } => write!(f, "{seat} wins on {line}"),
            Outcome::Draw => write!(f, "Draw"),
            Outcome::Abandoned => write!(f, "Abandoned"),
        }
    }
}
