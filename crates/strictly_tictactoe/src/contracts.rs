//! Contract-based validation.
//!
//! Contracts define correctness through preconditions and postconditions,
//! in the Hoare style: {P} action {Q}.

use super::action::{Move, MoveError};
use super::invariants::{BoardInvariants, InvariantSet};
use super::typestate::GameInProgress;
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// Preconditions and postconditions for a state transition.
pub trait Contract<S, A> {
    /// Error reported when a condition fails.
    type Error;

    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), Self::Error>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), Self::Error>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the square at the move's position must be empty.
pub struct SquareIsEmpty;

impl SquareIsEmpty {
    /// Checks the target square.
    #[instrument(skip(game))]
    pub fn check(mov: &Move, game: &GameInProgress) -> Result<(), MoveError> {
        if !game.board().is_empty(mov.position) {
            warn!(position = %mov.position, "Square already occupied");
            Err(MoveError::SquareOccupied(mov.position))
        } else {
            Ok(())
        }
    }
}

/// Precondition: it must be the seat's turn.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Checks the mover.
    #[instrument(skip(game))]
    pub fn check(mov: &Move, game: &GameInProgress) -> Result<(), MoveError> {
        if mov.seat != game.to_move() {
            warn!(seat = %mov.seat, to_move = %game.to_move(), "Move out of turn");
            Err(MoveError::WrongPlayer(mov.seat))
        } else {
            Ok(())
        }
    }
}

/// Composite precondition. Turn order is checked before the square, so an
/// out-of-turn move is reported as such whatever square it names.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(game))]
    pub fn check(mov: &Move, game: &GameInProgress) -> Result<(), MoveError> {
        PlayersTurn::check(mov, game)?;
        SquareIsEmpty::check(mov, game)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for move actions.
///
/// Preconditions:
/// - Must be the seat's turn
/// - Square must be empty
///
/// Postconditions:
/// - Exactly one more stone on the board
/// - Board invariants still hold
pub struct MoveContract;

impl Contract<GameInProgress, Move> for MoveContract {
    type Error = MoveError;

    fn pre(game: &GameInProgress, action: &Move) -> Result<(), MoveError> {
        LegalMove::check(action, game)
    }

    fn post(before: &GameInProgress, after: &GameInProgress) -> Result<(), MoveError> {
        if after.board().filled() != before.board().filled() + 1 {
            return Err(MoveError::InvariantViolation(
                "Postcondition failed: move did not place exactly one stone".to_string(),
            ));
        }

        BoardInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}
