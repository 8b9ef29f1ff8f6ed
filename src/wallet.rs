//! The seam to the outside world's value transfers.

use crate::call::{Amount, Identity};
use crate::error::SessionError;
use crate::escrow::Escrow;
use derive_more::{Display, Error};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument, warn};

/// A transfer that could not complete.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TransferError {
    /// The recipient cannot accept funds.
    #[display("{receiver} cannot receive funds")]
    Rejected {
        /// Intended recipient.
        receiver: Identity,
    },
    /// The recipient's balance would overflow.
    #[display("Balance of {receiver} would overflow")]
    Overflow {
        /// Intended recipient.
        receiver: Identity,
    },
}

/// The recipient's view of the escrow while a transfer to it is in flight.
///
/// Bound to one session and one identity: the only thing a recipient can do
/// with it is withdraw its own pending balance in that session.
pub struct Payee<'a> {
    escrow: &'a mut Escrow,
    session: &'a str,
    receiver: &'a Identity,
}

impl<'a> Payee<'a> {
    pub(crate) fn new(escrow: &'a mut Escrow, session: &'a str, receiver: &'a Identity) -> Self {
        Self {
            escrow,
            session,
            receiver,
        }
    }

    /// Identity being paid.
    pub fn receiver(&self) -> &Identity {
        self.receiver
    }

    /// Session the payment belongs to.
    pub fn session(&self) -> &str {
        self.session
    }

    /// What the receiver may still withdraw from this session.
    pub fn pending(&self) -> Amount {
        self.escrow.pending_withdrawal(self.session, self.receiver)
    }

    /// Calls back into the escrow to withdraw the receiver's own pending
    /// balance, paid through `wallet`.
    pub fn withdraw(&mut self, wallet: &mut dyn Wallet) -> Result<Amount, SessionError> {
        self.escrow.withdraw(self.session, self.receiver, wallet)
    }
}

/// Moves native currency from the escrow to an identity.
///
/// `payee` names the recipient and is its handle back into the contract while
/// the transfer runs. Callers must finish their own bookkeeping before
/// invoking `deliver`.
pub trait Wallet {
    /// Attempts to pay `amount` to `payee.receiver()`. An error leaves the
    /// funds with the caller.
    fn deliver(&mut self, payee: &mut Payee<'_>, amount: Amount) -> Result<(), TransferError>;
}

/// In-memory balances with a set of identities that refuse payment.
#[derive(Debug, Clone, Default)]
pub struct MemoryWallet {
    balances: BTreeMap<Identity, Amount>,
    refusing: BTreeSet<Identity>,
}

impl MemoryWallet {
    /// Creates an empty wallet where everyone accepts payment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes transfers to `who` fail, like a recipient without a receive path.
    pub fn refuse(&mut self, who: impl Into<Identity>) -> &mut Self {
        self.refusing.insert(who.into());
        self
    }

    /// Lets `who` receive payments again.
    pub fn accept(&mut self, who: &Identity) -> &mut Self {
        self.refusing.remove(who);
        self
    }

    /// Amount delivered to `who` so far.
    pub fn balance(&self, who: &Identity) -> Amount {
        self.balances.get(who).copied().unwrap_or(0)
    }

    /// Sum of everything delivered.
    pub fn total_delivered(&self) -> Amount {
        self.balances.values().sum()
    }
}

impl Wallet for MemoryWallet {
    #[instrument(skip(self, payee), fields(receiver = %payee.receiver()))]
    fn deliver(&mut self, payee: &mut Payee<'_>, amount: Amount) -> Result<(), TransferError> {
        let to = payee.receiver();
        if self.refusing.contains(to) {
            warn!(amount, "Recipient refused transfer");
            return Err(TransferError::Rejected {
                receiver: to.clone(),
            });
        }

        let balance = self.balances.entry(to.clone()).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| TransferError::Overflow {
                receiver: to.clone(),
            })?;
        debug!(amount, balance = *balance, "Transfer delivered");
        Ok(())
    }
}
