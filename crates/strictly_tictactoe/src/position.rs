//! Validated board coordinates.

use super::action::MoveError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A cell on the board, addressed as row `x` and column `y`, both in `0..=2`.
///
/// Construction goes through [`Position::new`], so a `Position` value is
/// always in bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    /// All 9 positions in row-major order.
    pub const ALL: [Position; 9] = [
        Position::at(0, 0),
        Position::at(0, 1),
        Position::at(0, 2),
        Position::at(1, 0),
        Position::at(1, 1),
        Position::at(1, 2),
        Position::at(2, 0),
        Position::at(2, 1),
        Position::at(2, 2),
    ];

    /// Creates a position, rejecting coordinates outside the board.
    #[instrument]
    pub fn new(x: u8, y: u8) -> Result<Self, MoveError> {
        if x > 2 || y > 2 {
            return Err(MoveError::OutOfBounds { x, y });
        }
        Ok(Self { x, y })
    }

    pub(crate) const fn at(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Row index.
    pub fn x(self) -> u8 {
        self.x
    }

    /// Column index.
    pub fn y(self) -> u8 {
        self.y
    }

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        usize::from(self.x) * 3 + usize::from(self.y)
    }

    /// Creates position from board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// True when the cell lies on the x == y diagonal.
    pub fn on_main_diagonal(self) -> bool {
        self.x == self.y
    }

    /// True when the cell lies on the x + y == 2 diagonal.
    pub fn on_anti_diagonal(self) -> bool {
        self.x + self.y == 2
    }

    /// Get label for this position (for display).
    pub fn label(self) -> &'static str {
        match (self.x, self.y) {
            (0, 0) => "Top-left",
            (0, 1) => "Top-center",
            (0, 2) => "Top-right",
            (1, 0) => "Middle-left",
            (1, 1) => "Center",
            (1, 2) => "Middle-right",
            (2, 0) => "Bottom-left",
            (2, 1) => "Bottom-center",
            _ => "Bottom-right",
        }
    }
}

impl TryFrom<(u8, u8)> for Position {
    type Error = MoveError;

    fn try_from((x, y): (u8, u8)) -> Result<Self, Self::Error> {
        Self::new(x, y)
    }
}

impl From<Position> for (u8, u8) {
    fn from(pos: Position) -> Self {
        (pos.x, pos.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_rejected() {
        assert!(matches!(
            Position::new(3, 0),
            Err(MoveError::OutOfBounds { x: 3, y: 0 })
        ));
        assert!(Position::new(0, 255).is_err());
        assert!(Position::new(2, 2).is_ok());
    }

    #[test]
    fn test_diagonals() {
        assert!(Position::at(1, 1).on_main_diagonal());
        assert!(Position::at(1, 1).on_anti_diagonal());
        assert!(Position::at(0, 2).on_anti_diagonal());
        assert!(!Position::at(0, 2).on_main_diagonal());
        assert!(!Position::at(0, 1).on_anti_diagonal());
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let pos: Position = serde_json::from_str("[1, 2]").unwrap();
        assert_eq!(pos, Position::at(1, 2));
        assert!(serde_json::from_str::<Position>("[1, 3]").is_err());
    }
}
