//! Phase-specific typestate structs.
//!
//! Each phase is its own type with phase-specific fields. A `GameFinished`
//! always carries an outcome, never `Option<Outcome>`.

use super::action::{Move, MoveError};
use super::contracts::{Contract, MoveContract};
use super::phases::Outcome;
use super::{Board, Seat, Square};
use tracing::{debug, instrument};

// ─────────────────────────────────────────────────────────────
//  Setup Phase
// ─────────────────────────────────────────────────────────────

/// Round in setup phase. The board is always empty.
#[derive(Debug, Clone)]
pub struct GameSetup {
    board: Board,
}

impl GameSetup {
    /// Creates a new round in setup phase.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Starts play with the given seat moving first.
    #[instrument(skip(self))]
    pub fn start(self, first_mover: Seat) -> GameInProgress {
        GameInProgress {
            board: self.board,
            history: Vec::new(),
            to_move: first_mover,
            first_mover,
        }
    }
}

impl Default for GameSetup {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────
//  InProgress Phase
// ─────────────────────────────────────────────────────────────

/// Round in progress - accepts moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameInProgress {
    pub(crate) board: Board,
    pub(crate) history: Vec<Move>,
    pub(crate) to_move: Seat,
    pub(crate) first_mover: Seat,
}

impl GameInProgress {
    /// Makes a move, consuming self.
    ///
    /// Preconditions are always checked; postconditions only in debug builds.
    /// After the stone is placed the lines through it are checked for a win,
    /// then the board for fullness, and only then does the turn pass.
    #[instrument(skip(self), fields(to_move = %self.to_move, moves = self.history.len()))]
    pub fn make_move(self, action: Move) -> Result<GameResult, MoveError> {
        MoveContract::pre(&self, &action)?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        let mut game = self;
        game.board
            .set(action.position, Square::Occupied(action.seat));
        game.history.push(action);

        if let Some(line) = super::rules::winning_line(&game.board, action.position, action.seat) {
            debug!(%line, seat = %action.seat, "Line completed");
            return Ok(GameResult::Finished(game.finish(Outcome::Winner {
                seat: action.seat,
                line,
            })));
        }

        if super::rules::is_full(&game.board) {
            debug!("Board full without a line");
            return Ok(GameResult::Finished(game.finish(Outcome::Draw)));
        }

        game.to_move = game.to_move.opponent();

        #[cfg(debug_assertions)]
        MoveContract::post(&before, &game)?;

        Ok(GameResult::InProgress(game))
    }

    /// Ends the round without a result.
    #[instrument(skip(self))]
    pub fn abandon(self) -> GameFinished {
        self.finish(Outcome::Abandoned)
    }

    fn finish(self, outcome: Outcome) -> GameFinished {
        GameFinished {
            board: self.board,
            history: self.history,
            outcome,
        }
    }

    /// Returns the seat to move.
    pub fn to_move(&self) -> Seat {
        self.to_move
    }

    /// Returns the seat that opened the round.
    pub fn first_mover(&self) -> Seat {
        self.first_mover
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns move history.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Number of stones placed.
    pub fn move_counter(&self) -> usize {
        self.history.len()
    }

    /// Replays moves from an empty board.
    #[instrument]
    pub fn replay(first_mover: Seat, moves: &[Move]) -> Result<GameResult, MoveError> {
        let mut game = GameSetup::new().start(first_mover);

        for action in moves {
            match game.make_move(*action)? {
                GameResult::InProgress(g) => game = g,
                GameResult::Finished(g) => return Ok(GameResult::Finished(g)),
            }
        }

        Ok(GameResult::InProgress(game))
    }
}

// ─────────────────────────────────────────────────────────────
//  Finished Phase
// ─────────────────────────────────────────────────────────────

/// Round finished - outcome determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFinished {
    board: Board,
    history: Vec<Move>,
    outcome: Outcome,
}

impl GameFinished {
    /// Returns the outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns move history.
    pub fn history(&self) -> &[Move] {
        &self.history
    }
}

// ─────────────────────────────────────────────────────────────
//  Result Type
// ─────────────────────────────────────────────────────────────

/// Result of making a move.
#[derive(Debug)]
pub enum GameResult {
    /// Round continues.
    InProgress(GameInProgress),
    /// Round finished.
    Finished(GameFinished),
}
