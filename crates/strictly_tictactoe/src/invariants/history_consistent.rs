//! History consistency invariant: the move counter matches occupied squares.

use super::super::GameInProgress;
use super::Invariant;

/// Invariant: number of recorded moves equals number of occupied squares.
pub struct HistoryConsistentInvariant;

impl Invariant<GameInProgress> for HistoryConsistentInvariant {
    fn holds(game: &GameInProgress) -> bool {
        game.move_counter() == game.board().filled()
    }

    fn description() -> &'static str {
        "Move counter matches number of occupied squares"
    }
}
