//! Invariants spanning a session and the escrow that backs it.

use crate::escrow::Escrow;
use crate::session::{GameSession, Round};
use derive_new::new;
use strictly_tictactoe::{Invariant, Seat};

/// A session viewed together with its funds.
#[derive(Debug, Clone, Copy, new)]
pub struct SessionAudit<'a> {
    /// Session under audit.
    pub session: &'a GameSession,
    /// Escrow holding its stakes.
    pub escrow: &'a Escrow,
}

/// Invariant: seats are distinct, and both are filled once play starts.
pub struct SeatsConsistent;

impl<'a> Invariant<SessionAudit<'a>> for SeatsConsistent {
    fn holds(audit: &SessionAudit<'a>) -> bool {
        let session = audit.session;
        let player1 = session.player(Seat::Player1);
        let player2 = session.player(Seat::Player2);

        if player1.is_some() && player1 == player2 {
            return false;
        }
        match session.round {
            Round::Open(_) => session.players().is_none(),
            Round::Playing(_) | Round::Settled(_) => session.players().is_some(),
        }
    }

    fn description() -> &'static str {
        "Seats are distinct and both filled once play starts"
    }
}

/// Invariant: the move counter equals the number of stones on the board.
pub struct MoveCounterConsistent;

impl<'a> Invariant<SessionAudit<'a>> for MoveCounterConsistent {
    fn holds(audit: &SessionAudit<'a>) -> bool {
        audit.session.move_counter() == audit.session.board().filled()
    }

    fn description() -> &'static str {
        "Move counter matches number of occupied squares"
    }
}

/// Invariant: every unit collected is in the pot, pending, or paid out.
pub struct PotConserved;

impl<'a> Invariant<SessionAudit<'a>> for PotConserved {
    fn holds(audit: &SessionAudit<'a>) -> bool {
        let id = audit.session.id();
        let account = audit.escrow.account(id);
        let accounted = u128::from(account.pot)
            + u128::from(audit.escrow.pending_total(id))
            + u128::from(account.paid_out);
        accounted == u128::from(account.collected)
    }

    fn description() -> &'static str {
        "Pot, pending withdrawals and payouts add up to collected stakes"
    }
}

/// Everything checked after each session operation.
pub type SessionInvariants = (SeatsConsistent, MoveCounterConsistent, PotConserved);
