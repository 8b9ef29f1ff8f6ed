//! Win detection.

use super::super::{Board, Line, Position, Seat, Square};
use tracing::instrument;

fn owned_by(board: &Board, line: Line, seat: Seat) -> bool {
    let cells = line.cells();
    cells.len() == 3
        && cells
            .iter()
            .all(|pos| board.get(*pos) == Square::Occupied(seat))
}

/// Checks the lines running through `last` for one fully owned by `seat`.
///
/// Lines are tried in a fixed order: the row, the column, the main diagonal
/// (only if x == y) and the anti-diagonal (only if x + y == 2). The first
/// match is returned.
#[instrument(skip(board))]
pub fn winning_line(board: &Board, last: Position, seat: Seat) -> Option<Line> {
    let mut candidates = vec![Line::Row(last.x()), Line::Column(last.y())];
    if last.on_main_diagonal() {
        candidates.push(Line::Diagonal);
    }
    if last.on_anti_diagonal() {
        candidates.push(Line::AntiDiagonal);
    }

    candidates
        .into_iter()
        .find(|line| owned_by(board, *line, seat))
}
