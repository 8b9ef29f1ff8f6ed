//! Deferred payouts, withdrawals and re-entrant recipients.

use std::collections::BTreeMap;
use strictly_stakes::{
    Amount, Arena, BlockInfo, Call, Event, Identity, MemoryWallet, Payee, SessionError,
    TableConfig, TransferError, Wallet,
};

const STAKE: u64 = 10;
const ID: &str = "table";

fn seated() -> Arena {
    let mut arena = Arena::new();
    seat(&mut arena, ID, "alice", "bob");
    arena
}

/// Opens `id` with `first` in seat 1 to move first and `second` in seat 2.
fn seat(arena: &mut Arena, id: &str, first: &str, second: &str) {
    arena
        .open_session(id, TableConfig::new(STAKE, 60).unwrap())
        .unwrap();
    let block = BlockInfo::new(1, 0);
    arena
        .join_game_as_player1(id, &Call::new(Identity::from(first), STAKE, block))
        .unwrap();
    arena
        .join_game_as_player2(id, &Call::new(Identity::from(second), STAKE, block))
        .unwrap();
}

/// Plays a row win for alice, returning the final move's events.
fn alice_wins(arena: &mut Arena, wallet: &mut dyn Wallet) -> Vec<Event> {
    row_win(arena, ID, "alice", "bob", wallet)
}

/// Plays a top-row win for `winner` in session `id`.
fn row_win(
    arena: &mut Arena,
    id: &str,
    winner: &str,
    loser: &str,
    wallet: &mut dyn Wallet,
) -> Vec<Event> {
    let moves = [
        (winner, 0, 0),
        (loser, 1, 0),
        (winner, 0, 1),
        (loser, 1, 1),
        (winner, 0, 2),
    ];
    let mut last = Vec::new();
    for (i, (who, x, y)) in moves.into_iter().enumerate() {
        let call = Call::plain(who, BlockInfo::new(2, i as u64 + 1));
        last = arena.set_stone(id, &call, x, y, wallet).unwrap();
    }
    last
}

/// Recipient that calls back into the escrow to withdraw again mid-transfer.
#[derive(Default)]
struct ReentrantWallet {
    received: BTreeMap<Identity, Amount>,
    reentries: Vec<(String, Identity, Result<Amount, SessionError>)>,
    depth: usize,
}

impl Wallet for ReentrantWallet {
    fn deliver(&mut self, payee: &mut Payee<'_>, amount: Amount) -> Result<(), TransferError> {
        *self.received.entry(payee.receiver().clone()).or_insert(0) += amount;
        if self.depth == 0 {
            self.depth += 1;
            let result = payee.withdraw(self);
            self.reentries.push((
                payee.session().to_string(),
                payee.receiver().clone(),
                result,
            ));
            self.depth -= 1;
        }
        Ok(())
    }
}

#[test]
fn test_failed_win_payout_goes_to_pending() {
    let mut arena = seated();
    let mut wallet = MemoryWallet::new();
    wallet.refuse("alice");
    let alice = Identity::from("alice");

    let events = alice_wins(&mut arena, &mut wallet);

    assert_eq!(
        events,
        vec![
            Event::GameOverWithWin {
                winner: alice.clone()
            },
            Event::PayoutDeferred {
                receiver: alice.clone(),
                amount: 2 * STAKE
            },
        ]
    );
    assert_eq!(arena.pending_withdrawal(ID, &alice).unwrap(), 2 * STAKE);
    assert_eq!(arena.view(ID).unwrap().pot, 0);

    wallet.accept(&alice);
    let withdraw = Call::plain("alice", BlockInfo::new(3, 20));
    assert_eq!(
        arena.withdraw_win(ID, &withdraw, &mut wallet),
        Ok(vec![Event::PayoutSuccess {
            receiver: alice.clone(),
            amount: 2 * STAKE
        }])
    );
    assert_eq!(wallet.balance(&alice), 2 * STAKE);
    assert_eq!(arena.pending_withdrawal(ID, &alice).unwrap(), 0);
    assert_eq!(
        arena.withdraw_win(ID, &withdraw, &mut wallet),
        Err(SessionError::NothingToWithdraw { caller: alice })
    );
}

#[test]
fn test_withdraw_transfer_failure_keeps_balance() {
    let mut arena = seated();
    let mut wallet = MemoryWallet::new();
    wallet.refuse("alice");
    alice_wins(&mut arena, &mut wallet);

    let withdraw = Call::plain("alice", BlockInfo::new(3, 20));
    assert_eq!(
        arena.withdraw_win(ID, &withdraw, &mut wallet),
        Err(SessionError::TransferFailed {
            receiver: Identity::from("alice"),
            amount: 2 * STAKE
        })
    );
    assert_eq!(
        arena
            .pending_withdrawal(ID, &Identity::from("alice"))
            .unwrap(),
        2 * STAKE
    );
}

#[test]
fn test_reentrant_withdraw_pays_once() {
    let mut arena = seated();
    let mut refusing = MemoryWallet::new();
    refusing.refuse("alice");
    alice_wins(&mut arena, &mut refusing);

    let mut hostile = ReentrantWallet::default();
    let withdraw = Call::plain("alice", BlockInfo::new(3, 20));
    arena.withdraw_win(ID, &withdraw, &mut hostile).unwrap();

    assert_eq!(hostile.received[&Identity::from("alice")], 2 * STAKE);
    assert_eq!(
        hostile.reentries,
        vec![(
            ID.to_string(),
            Identity::from("alice"),
            Err(SessionError::NothingToWithdraw {
                caller: Identity::from("alice")
            })
        )]
    );
    assert_eq!(
        arena
            .pending_withdrawal(ID, &Identity::from("alice"))
            .unwrap(),
        0
    );
}

#[test]
fn test_reentrant_winner_sees_settled_state() {
    let mut arena = seated();
    let mut hostile = ReentrantWallet::default();

    alice_wins(&mut arena, &mut hostile);

    assert_eq!(hostile.received[&Identity::from("alice")], 2 * STAKE);
    assert_eq!(hostile.reentries.len(), 1);
    assert!(hostile.reentries[0].2.is_err());
    let session = arena.session(ID).unwrap();
    assert!(!session.is_active());
    assert!(session.audit(arena.escrow()).is_ok());
}

#[test]
fn test_recipient_in_other_session_cannot_touch_foreign_balance() {
    let mut arena = Arena::new();
    seat(&mut arena, "a", "alice", "bob");
    seat(&mut arena, "b", "carol", "dave");
    let alice = Identity::from("alice");

    let mut refusing = MemoryWallet::new();
    refusing.refuse("alice");
    row_win(&mut arena, "a", "alice", "bob", &mut refusing);
    assert_eq!(arena.pending_withdrawal("a", &alice).unwrap(), 2 * STAKE);

    // Carol's payout in "b" calls back in while it is being paid.
    let mut hostile = ReentrantWallet::default();
    row_win(&mut arena, "b", "carol", "dave", &mut hostile);

    assert_eq!(
        hostile.reentries,
        vec![(
            "b".to_string(),
            Identity::from("carol"),
            Err(SessionError::NothingToWithdraw {
                caller: Identity::from("carol")
            })
        )]
    );
    assert_eq!(hostile.received.get(&alice), None);
    assert_eq!(arena.pending_withdrawal("a", &alice).unwrap(), 2 * STAKE);
    assert!(arena.session("a").unwrap().audit(arena.escrow()).is_ok());
    assert!(arena.session("b").unwrap().audit(arena.escrow()).is_ok());
}
