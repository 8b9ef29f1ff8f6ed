//! Pots and the pending-withdrawal ledger.
//!
//! One `Escrow` can back many sessions: every pot and pending entry is keyed
//! by session id. All bookkeeping happens before a [`Wallet`] is asked to move
//! funds, so a recipient that calls back in through its [`Payee`] handle sees
//! the final state.

use crate::call::{Amount, Identity};
use crate::error::SessionError;
use crate::events::Event;
use crate::wallet::{Payee, Wallet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Running totals of one session's funds.
///
/// `pot + pending + paid_out == collected` at all times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PotAccount {
    /// Stakes held awaiting settlement.
    pub pot: Amount,
    /// Every stake ever collected.
    pub collected: Amount,
    /// Everything that reached a recipient.
    pub paid_out: Amount,
}

/// Holds stakes, settles them and records what could not be paid.
#[derive(Debug, Clone, Default)]
pub struct Escrow {
    accounts: BTreeMap<SessionId, PotAccount>,
    pending: BTreeMap<(SessionId, Identity), Amount>,
}

impl Escrow {
    /// Creates an empty escrow.
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals for a session; zero for sessions that never collected.
    pub fn account(&self, session: &str) -> PotAccount {
        self.accounts.get(session).copied().unwrap_or_default()
    }

    /// Stakes currently held for a session.
    pub fn pot(&self, session: &str) -> Amount {
        self.account(session).pot
    }

    /// What `who` may withdraw from a session.
    pub fn pending_withdrawal(&self, session: &str, who: &Identity) -> Amount {
        self.pending
            .get(&(session.to_string(), who.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of all pending withdrawals of a session.
    pub fn pending_total(&self, session: &str) -> Amount {
        self.pending
            .iter()
            .filter(|((id, _), _)| id == session)
            .map(|(_, amount)| *amount)
            .sum()
    }

    fn account_mut(&mut self, session: &str) -> &mut PotAccount {
        self.accounts.entry(session.to_string()).or_default()
    }

    /// Adds a stake to the pot.
    #[instrument(skip(self))]
    pub(crate) fn collect_stake(&mut self, session: &str, amount: Amount) -> Result<(), SessionError> {
        let account = self.account(session);
        let pot = account
            .pot
            .checked_add(amount)
            .ok_or(SessionError::Arithmetic)?;
        let collected = account
            .collected
            .checked_add(amount)
            .ok_or(SessionError::Arithmetic)?;

        let account = self.account_mut(session);
        account.pot = pot;
        account.collected = collected;
        debug!(pot, collected, "Stake collected");
        Ok(())
    }

    fn take_pot(&mut self, session: &str) -> Amount {
        std::mem::take(&mut self.account_mut(session).pot)
    }

    fn credit(&mut self, session: &str, who: &Identity, amount: Amount) {
        let entry = self
            .pending
            .entry((session.to_string(), who.clone()))
            .or_insert(0);
        // Bounded by the session's collected total, which is a checked u64.
        *entry = entry.saturating_add(amount);
    }

    /// Transfers `amount`, which must already be out of the pot, or records
    /// it as pending if the transfer fails.
    ///
    /// `paid_out` is raised before the wallet runs and lowered again on
    /// failure, so the totals balance at every point a recipient can observe.
    fn pay_or_defer(
        &mut self,
        session: &str,
        receiver: &Identity,
        amount: Amount,
        wallet: &mut dyn Wallet,
    ) -> Event {
        let Some(paid_out) = self.account(session).paid_out.checked_add(amount) else {
            warn!(%receiver, amount, "Payout total would overflow, deferring to pending withdrawals");
            self.credit(session, receiver, amount);
            return Event::PayoutDeferred {
                receiver: receiver.clone(),
                amount,
            };
        };
        self.account_mut(session).paid_out = paid_out;

        let delivered = wallet.deliver(&mut Payee::new(self, session, receiver), amount);
        match delivered {
            Ok(()) => {
                info!(%receiver, amount, "Payout delivered");
                Event::PayoutSuccess {
                    receiver: receiver.clone(),
                    amount,
                }
            }
            Err(err) => {
                warn!(%receiver, amount, error = %err, "Payout failed, deferring to pending withdrawals");
                self.unrecord_payout(session, amount);
                self.credit(session, receiver, amount);
                Event::PayoutDeferred {
                    receiver: receiver.clone(),
                    amount,
                }
            }
        }
    }

    fn unrecord_payout(&mut self, session: &str, amount: Amount) {
        let account = self.account_mut(session);
        account.paid_out = account.paid_out.saturating_sub(amount);
    }

    /// Pays the whole pot to the winner.
    #[instrument(skip(self, wallet))]
    pub(crate) fn settle_win(
        &mut self,
        session: &str,
        winner: &Identity,
        wallet: &mut dyn Wallet,
    ) -> Vec<Event> {
        let amount = self.take_pot(session);
        if amount == 0 {
            return Vec::new();
        }
        vec![self.pay_or_defer(session, winner, amount, wallet)]
    }

    /// Splits the pot between both players with independent transfers.
    ///
    /// An odd pot leaves its last unit with the second receiver.
    #[instrument(skip(self, wallet))]
    pub(crate) fn settle_draw(
        &mut self,
        session: &str,
        receivers: [&Identity; 2],
        wallet: &mut dyn Wallet,
    ) -> Vec<Event> {
        let pot = self.take_pot(session);
        let half = pot / 2;
        let shares = [half, pot - half];

        let mut events = Vec::with_capacity(2);
        for (receiver, amount) in receivers.into_iter().zip(shares) {
            if amount > 0 {
                events.push(self.pay_or_defer(session, receiver, amount, wallet));
            }
        }
        events
    }

    /// Moves up to `amount` from the pot into `player`'s pending withdrawal.
    #[instrument(skip(self))]
    pub(crate) fn refund_to_pending(
        &mut self,
        session: &str,
        player: &Identity,
        amount: Amount,
    ) -> Option<Event> {
        let account = self.account_mut(session);
        let amount = amount.min(account.pot);
        if amount == 0 {
            return None;
        }
        account.pot -= amount;
        self.credit(session, player, amount);
        info!(%player, amount, "Stake refunded to pending withdrawals");
        Some(Event::StakeRefunded {
            player: player.clone(),
            amount,
        })
    }

    /// Pays out `caller`'s pending balance.
    ///
    /// The entry is zeroed before the wallet runs, so a recipient that calls
    /// back in finds nothing left to take. If the transfer fails the entry is
    /// restored and the call is rejected.
    #[instrument(skip(self, wallet))]
    pub(crate) fn withdraw(
        &mut self,
        session: &str,
        caller: &Identity,
        wallet: &mut dyn Wallet,
    ) -> Result<Amount, SessionError> {
        let amount = self.pending_withdrawal(session, caller);
        if amount == 0 {
            warn!(%caller, "Nothing to withdraw");
            return Err(SessionError::NothingToWithdraw {
                caller: caller.clone(),
            });
        }
        let paid_out = self
            .account(session)
            .paid_out
            .checked_add(amount)
            .ok_or(SessionError::Arithmetic)?;

        self.pending.remove(&(session.to_string(), caller.clone()));
        self.account_mut(session).paid_out = paid_out;

        let delivered = wallet.deliver(&mut Payee::new(self, session, caller), amount);
        match delivered {
            Ok(()) => {
                info!(%caller, amount, "Pending withdrawal paid");
                Ok(amount)
            }
            Err(err) => {
                warn!(%caller, amount, error = %err, "Withdrawal transfer failed, restoring balance");
                self.unrecord_payout(session, amount);
                self.credit(session, caller, amount);
                Err(SessionError::TransferFailed {
                    receiver: caller.clone(),
                    amount,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::MemoryWallet;

    const SESSION: &str = "table";

    fn funded(stakes: Amount) -> Escrow {
        let mut escrow = Escrow::new();
        escrow.collect_stake(SESSION, stakes).unwrap();
        escrow.collect_stake(SESSION, stakes).unwrap();
        escrow
    }

    fn conserved(escrow: &Escrow) -> bool {
        let account = escrow.account(SESSION);
        account.pot + escrow.pending_total(SESSION) + account.paid_out == account.collected
    }

    #[test]
    fn test_win_pays_whole_pot() {
        let mut escrow = funded(50);
        let mut wallet = MemoryWallet::new();
        let winner = Identity::from("alice");

        let events = escrow.settle_win(SESSION, &winner, &mut wallet);

        assert_eq!(
            events,
            vec![Event::PayoutSuccess {
                receiver: winner.clone(),
                amount: 100
            }]
        );
        assert_eq!(wallet.balance(&winner), 100);
        assert_eq!(escrow.pot(SESSION), 0);
        assert!(conserved(&escrow));
    }

    #[test]
    fn test_draw_failure_is_independent() {
        let mut escrow = funded(50);
        let mut wallet = MemoryWallet::new();
        wallet.refuse("bob");
        let alice = Identity::from("alice");
        let bob = Identity::from("bob");

        escrow.settle_draw(SESSION, [&alice, &bob], &mut wallet);

        assert_eq!(wallet.balance(&alice), 50);
        assert_eq!(wallet.balance(&bob), 0);
        assert_eq!(escrow.pending_withdrawal(SESSION, &bob), 50);
        assert_eq!(escrow.pending_withdrawal(SESSION, &alice), 0);
        assert!(conserved(&escrow));
    }

    #[test]
    fn test_odd_pot_split() {
        let mut escrow = Escrow::new();
        escrow.collect_stake(SESSION, 7).unwrap();
        let mut wallet = MemoryWallet::new();
        let alice = Identity::from("alice");
        let bob = Identity::from("bob");

        escrow.settle_draw(SESSION, [&alice, &bob], &mut wallet);

        assert_eq!(wallet.balance(&alice), 3);
        assert_eq!(wallet.balance(&bob), 4);
        assert!(conserved(&escrow));
    }

    #[test]
    fn test_failed_withdrawal_restores_entry() {
        let mut escrow = funded(50);
        let mut wallet = MemoryWallet::new();
        wallet.refuse("alice");
        let alice = Identity::from("alice");
        escrow.settle_win(SESSION, &alice, &mut wallet);

        let err = escrow.withdraw(SESSION, &alice, &mut wallet).unwrap_err();
        assert_eq!(
            err,
            SessionError::TransferFailed {
                receiver: alice.clone(),
                amount: 100
            }
        );
        assert_eq!(escrow.pending_withdrawal(SESSION, &alice), 100);

        wallet.accept(&alice);
        assert_eq!(escrow.withdraw(SESSION, &alice, &mut wallet), Ok(100));
        assert_eq!(escrow.pending_withdrawal(SESSION, &alice), 0);
        assert!(conserved(&escrow));
    }

    #[test]
    fn test_failed_payout_leaves_paid_out_untouched() {
        let mut escrow = funded(50);
        let mut wallet = MemoryWallet::new();
        wallet.refuse("alice");
        let alice = Identity::from("alice");

        escrow.settle_win(SESSION, &alice, &mut wallet);
        assert_eq!(escrow.account(SESSION).paid_out, 0);
        assert!(conserved(&escrow));

        assert!(escrow.withdraw(SESSION, &alice, &mut wallet).is_err());
        assert_eq!(escrow.account(SESSION).paid_out, 0);
        assert!(conserved(&escrow));
    }

    #[test]
    fn test_collect_overflow_rejected() {
        let mut escrow = Escrow::new();
        escrow.collect_stake(SESSION, Amount::MAX).unwrap();
        assert_eq!(
            escrow.collect_stake(SESSION, 1),
            Err(SessionError::Arithmetic)
        );
        assert_eq!(escrow.pot(SESSION), Amount::MAX);
    }

    #[test]
    fn test_ledgers_are_per_session() {
        let mut escrow = funded(50);
        let mut wallet = MemoryWallet::new();
        wallet.refuse("alice");
        let alice = Identity::from("alice");
        escrow.settle_win(SESSION, &alice, &mut wallet);

        assert_eq!(escrow.pending_withdrawal("other", &alice), 0);
        wallet.accept(&alice);
        assert!(escrow.withdraw("other", &alice, &mut wallet).is_err());
    }
}
