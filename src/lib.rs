//! Strictly Stakes - stake-backed tic-tac-toe with escrowed payouts.
//!
//! Two identities each deposit the same entry stake, play a 3x3 game, and the
//! pot goes to the winner or is split on a draw. Every transfer that fails is
//! recorded as a pending withdrawal the recipient can drain later, and an
//! abandoned game can be settled by anyone once its deadline passes.
//!
//! # Architecture
//!
//! - **Session**: seating, moves and reset of one game ([`GameSession`])
//! - **Escrow**: pots, payouts and the pending-withdrawal ledger ([`Escrow`])
//! - **Timeout**: rolling deadline and forced draw settlement ([`Deadline`])
//! - **Arena**: many sessions sharing one escrow ([`Arena`])
//! - **Wallet**: the seam to external transfers ([`Wallet`])
//!
//! Board rules, typestate phases and contracts live in `strictly_tictactoe`.
//!
//! # Example
//!
//! ```
//! use strictly_stakes::{Arena, BlockInfo, Call, Identity, MemoryWallet, TableConfig};
//!
//! let mut arena = Arena::new();
//! arena.open_session("main", TableConfig::new(10, 60)?)?;
//!
//! let block = BlockInfo::new(1, 0);
//! arena.join_game_as_player1("main", &Call::new(Identity::from("alice"), 10, block))?;
//! arena.join_game_as_player2("main", &Call::new(Identity::from("bob"), 10, block))?;
//!
//! let mut wallet = MemoryWallet::new();
//! arena.set_stone("main", &Call::plain("alice", block), 1, 1, &mut wallet)?;
//! assert_eq!(arena.view("main")?.move_counter, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod arena;
mod call;
mod config;
mod error;
mod escrow;
mod events;
mod invariants;
mod script;
mod session;
mod timeout;
mod wallet;

// Crate-level exports
pub use arena::Arena;
pub use call::{Amount, BlockInfo, Call, Identity, Timestamp};
pub use config::{ConfigError, TableConfig};
pub use error::SessionError;
pub use escrow::{Escrow, PotAccount, SessionId};
pub use events::Event;
pub use invariants::{
    MoveCounterConsistent, PotConserved, SeatsConsistent, SessionAudit, SessionInvariants,
};
pub use script::{Action, Script, Step, StepOutcome, StepReport};
pub use session::{GameSession, GameView, Phase, Players};
pub use timeout::Deadline;
pub use wallet::{MemoryWallet, Payee, TransferError, Wallet};

pub use strictly_tictactoe::{Board, Outcome, Position, Seat, Square};
