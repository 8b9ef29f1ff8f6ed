//! Pure 3x3 board logic for stake-backed tic-tac-toe.
//!
//! # Architecture
//!
//! - **Types**: seats, squares and the board
//! - **Rules**: win and draw detection as pure functions
//! - **Typestate**: `GameSetup` → `GameInProgress` → `GameFinished`
//! - **Contracts / invariants**: checked pre- and postconditions of a move
//!
//! Nothing here knows about stakes, deadlines or callers; the hosting crate
//! maps identities onto [`Seat`]s.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod contracts;
mod invariants;
mod phases;
mod position;
pub mod rules;
mod types;
mod typestate;

pub use action::{Move, MoveError};
pub use contracts::{Contract, LegalMove, MoveContract, PlayersTurn, SquareIsEmpty};
pub use invariants::{
    AlternatingTurnInvariant, BoardInvariants, HistoryConsistentInvariant, Invariant,
    InvariantSet, InvariantViolation, MonotonicBoardInvariant,
};
pub use phases::{Line, Outcome};
pub use position::Position;
pub use types::{Board, Seat, Square};
pub use typestate::{GameFinished, GameInProgress, GameResult, GameSetup};
