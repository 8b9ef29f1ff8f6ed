//! Alternating turn invariant: seats take turns starting with the first mover.

use super::super::GameInProgress;
use super::Invariant;

/// Invariant: seats alternate.
///
/// The first recorded move belongs to the first mover, no seat moves twice in
/// a row, and the seat to move next is the one that did not move last.
pub struct AlternatingTurnInvariant;

impl Invariant<GameInProgress> for AlternatingTurnInvariant {
    fn holds(game: &GameInProgress) -> bool {
        let history = game.history();

        let Some(first) = history.first() else {
            return game.to_move() == game.first_mover();
        };

        if first.seat != game.first_mover() {
            return false;
        }

        if history.windows(2).any(|pair| pair[0].seat == pair[1].seat) {
            return false;
        }

        let expected_next = if history.len() % 2 == 0 {
            game.first_mover()
        } else {
            game.first_mover().opponent()
        };

        game.to_move() == expected_next
    }

    fn description() -> &'static str {
        "Seats alternate turns starting with the first mover"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameResult, GameSetup, Move, Position, Seat};

    #[test]
    fn test_empty_game_holds() {
        let game = GameSetup::new().start(Seat::Player2);
        assert!(AlternatingTurnInvariant::holds(&game));
    }

    #[test]
    fn test_alternating_sequence_holds() {
        let moves = vec![
            Move::new(Seat::Player2, Position::at(0, 0)),
            Move::new(Seat::Player1, Position::at(1, 1)),
            Move::new(Seat::Player2, Position::at(0, 2)),
        ];

        let Ok(GameResult::InProgress(game)) = GameInProgress::replay(Seat::Player2, &moves) else {
            panic!("Expected in-progress game");
        };
        assert!(AlternatingTurnInvariant::holds(&game));
        assert_eq!(game.to_move(), Seat::Player1);
    }

    #[test]
    fn test_same_seat_twice_violates() {
        let mut game = GameSetup::new().start(Seat::Player1);
        game.history = vec![
            Move::new(Seat::Player1, Position::at(0, 0)),
            Move::new(Seat::Player1, Position::at(1, 1)),
        ];
        assert!(!AlternatingTurnInvariant::holds(&game));
    }
}
