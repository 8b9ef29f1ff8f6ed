//! Observations emitted for external subscribers.

use crate::call::{Amount, Identity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strictly_tictactoe::Seat;

/// Something a UI or indexer may want to react to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A player took a seat and paid the stake.
    PlayerJoined {
        /// Seat taken.
        seat: Seat,
        /// Who joined.
        player: Identity,
    },
    /// The turn passed (or play opened) to this player.
    NextPlayer {
        /// Player to move.
        player: Identity,
    },
    /// The round ended with a completed line.
    GameOverWithWin {
        /// Winning player.
        winner: Identity,
    },
    /// The round ended in a draw, by full board or timeout.
    GameOverWithDraw,
    /// Funds reached their recipient.
    PayoutSuccess {
        /// Recipient.
        receiver: Identity,
        /// Amount transferred.
        amount: Amount,
    },
    /// A transfer failed and the amount was credited to pending withdrawals.
    PayoutDeferred {
        /// Intended recipient.
        receiver: Identity,
        /// Amount now pending.
        amount: Amount,
    },
    /// A stake left in an unplayed session was moved to pending withdrawals.
    StakeRefunded {
        /// Player credited.
        player: Identity,
        /// Amount credited.
        amount: Amount,
    },
    /// The board and seats were cleared.
    GameReset {
        /// Player who reset.
        by: Identity,
    },
}
