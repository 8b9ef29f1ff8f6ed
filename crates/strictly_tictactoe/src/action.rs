//! First-class action types.
//!
//! Moves are domain events, not side effects. They carry the seat's intent
//! and are validated against the game before anything is written.

use super::{Position, Seat};
use serde::{Deserialize, Serialize};

/// A seat placing its stone at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The seat making the move.
    pub seat: Seat,
    /// Where the stone goes.
    pub position: Position,
}

impl Move {
    /// Creates a new move.
    pub fn new(seat: Seat, position: Position) -> Self {
        Self { seat, position }
    }

    /// Returns the seat making this move.
    pub fn seat(&self) -> Seat {
        self.seat
    }

    /// Returns the position of this move.
    pub fn position(&self) -> Position {
        self.position
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.seat, self.position.label())
    }
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Coordinates fall outside the 3x3 grid.
    #[display("Position ({x}, {y}) is outside the board")]
    OutOfBounds {
        /// Requested row.
        x: u8,
        /// Requested column.
        y: u8,
    },

    /// The square at the position is already occupied.
    #[display("Square {_0} is already occupied")]
    SquareOccupied(Position),

    /// It's not this seat's turn.
    #[display("It's not {_0}'s turn")]
    WrongPlayer(Seat),

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {_0}")]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}
