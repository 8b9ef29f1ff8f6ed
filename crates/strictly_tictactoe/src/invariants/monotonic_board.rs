//! Monotonic board invariant: squares never change once set.

use super::super::{Board, GameInProgress, Square};
use super::Invariant;

/// Invariant: board squares are monotonic (never overwritten).
///
/// Once a square goes from Empty to Occupied it never changes. Verified by
/// replaying the move history onto an empty board and comparing.
pub struct MonotonicBoardInvariant;

impl Invariant<GameInProgress> for MonotonicBoardInvariant {
    fn holds(game: &GameInProgress) -> bool {
        let mut reconstructed = Board::new();

        for mov in game.history() {
            if !reconstructed.is_empty(mov.position) {
                return false;
            }
            reconstructed.set(mov.position, Square::Occupied(mov.seat));
        }

        reconstructed == *game.board()
    }

    fn description() -> &'static str {
        "Board squares are monotonic (never overwritten)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameResult, GameSetup, Move, Position, Seat};

    #[test]
    fn test_empty_game_holds() {
        let game = GameSetup::new().start(Seat::Player1);
        assert!(MonotonicBoardInvariant::holds(&game));
    }

    #[test]
    fn test_multiple_moves_hold() {
        let moves = vec![
            Move::new(Seat::Player1, Position::at(0, 0)),
            Move::new(Seat::Player2, Position::at(1, 1)),
            Move::new(Seat::Player1, Position::at(0, 2)),
            Move::new(Seat::Player2, Position::at(2, 0)),
        ];

        let Ok(GameResult::InProgress(game)) = GameInProgress::replay(Seat::Player1, &moves) else {
            panic!("Expected in-progress game");
        };
        assert!(MonotonicBoardInvariant::holds(&game));
    }

    #[test]
    fn test_overwritten_square_violates() {
        let game = GameSetup::new().start(Seat::Player1);
        let action = Move::new(Seat::Player1, Position::at(1, 1));

        let Ok(GameResult::InProgress(mut game)) = game.make_move(action) else {
            panic!("Expected in-progress game");
        };
        game.board
            .set(Position::at(1, 1), Square::Occupied(Seat::Player2));
        assert!(!MonotonicBoardInvariant::holds(&game));
    }
}
