//! Draw detection.

use super::super::{Board, Square};
use tracing::instrument;

/// Checks if the board is full (all squares occupied).
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.squares().iter().all(|s| *s != Square::Empty)
}

#[cfg(test)]
mod tests {
    use super::super::super::{Position, Seat};
    use super::*;

    fn fill(pattern: [Seat; 9]) -> Board {
        let mut board = Board::new();
        for (pos, seat) in Position::ALL.into_iter().zip(pattern) {
            board.set(pos, Square::Occupied(seat));
        }
        board
    }

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new();
        board.set(Position::at(1, 1), Square::Occupied(Seat::Player1));
        assert!(!is_full(&board));
    }

    #[test]
    fn test_full_board_regardless_of_lines() {
        use Seat::{Player1 as A, Player2 as B};
        // A B A / A B B / B A A has no line; A A A on top does.
        assert!(is_full(&fill([A, B, A, A, B, B, B, A, A])));
        assert!(is_full(&fill([A, A, A, B, B, A, B, A, B])));
    }
}
