//! Rejections reported by session operations.

use crate::call::{Amount, Identity, Timestamp};
use crate::escrow::SessionId;
use derive_more::{Display, Error, From};
use strictly_tictactoe::{MoveError, Seat};

/// Why an operation was rejected. A rejected operation changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// The caller already holds a seat.
    #[display("{caller} already holds a seat")]
    AlreadyJoined {
        /// Rejected caller.
        caller: Identity,
    },

    /// The requested seat is taken.
    #[display("{seat} is already taken")]
    SeatTaken {
        /// Requested seat.
        seat: Seat,
    },

    /// The attached value is not exactly the entry stake.
    #[display("Stake must be exactly {expected}, got {got}")]
    WrongStake {
        /// Configured entry stake.
        expected: Amount,
        /// Attached value.
        got: Amount,
    },

    /// Value was attached to an operation that takes none.
    #[display("Operation takes no value, got {value}")]
    UnexpectedValue {
        /// Attached value.
        value: Amount,
    },

    /// No game is being played.
    #[display("Game is not active")]
    NotActive,

    /// The reaction window closed; settle through the timeout instead.
    #[display("Deadline {deadline} has passed (now {now})")]
    DeadlineElapsed {
        /// Current deadline.
        deadline: Timestamp,
        /// Block time of the call.
        now: Timestamp,
    },

    /// The reaction window is still open.
    #[display("Deadline {deadline} has not passed yet (now {now})")]
    DeadlineNotElapsed {
        /// Current deadline.
        deadline: Timestamp,
        /// Block time of the call.
        now: Timestamp,
    },

    /// The caller is not the player to move.
    #[display("It is not {caller}'s turn")]
    NotYourTurn {
        /// Rejected caller.
        caller: Identity,
    },

    /// The caller holds no seat.
    #[display("{caller} is not a player in this session")]
    NotAPlayer {
        /// Rejected caller.
        caller: Identity,
    },

    /// Reset was requested while a game is being played.
    #[display("Cannot reset while a game is active")]
    ResetWhileActive,

    /// The caller has no pending withdrawal.
    #[display("{caller} has nothing to withdraw")]
    NothingToWithdraw {
        /// Rejected caller.
        caller: Identity,
    },

    /// A withdrawal transfer failed; the balance stays pending.
    #[display("Transfer of {amount} to {receiver} failed")]
    TransferFailed {
        /// Intended recipient.
        receiver: Identity,
        /// Amount that stays pending.
        amount: Amount,
    },

    /// No session with this id.
    #[display("Unknown session {id}")]
    UnknownSession {
        /// Requested id.
        id: SessionId,
    },

    /// A session with this id already exists.
    #[display("Session {id} already exists")]
    SessionExists {
        /// Requested id.
        id: SessionId,
    },

    /// Pot accounting would overflow.
    #[display("Pot arithmetic overflow")]
    Arithmetic,

    /// The board rejected the move.
    #[display("Invalid move: {_0}")]
    #[from]
    Move(MoveError),
}
