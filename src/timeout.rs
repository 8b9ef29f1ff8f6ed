//! Rolling deadline and the forced timeout settlement.

use crate::call::{Call, Timestamp};
use crate::error::SessionError;
use crate::escrow::Escrow;
use crate::events::Event;
use crate::session::{GameSession, Round};
use crate::wallet::Wallet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Absolute time after which an active game counts as abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Deadline(Timestamp);

impl Deadline {
    /// Deadline at the given time.
    pub fn at(time: Timestamp) -> Self {
        Self(time)
    }

    /// The deadline as a timestamp.
    pub fn time(self) -> Timestamp {
        self.0
    }

    /// Moves the deadline to `now + window`.
    pub fn extend(&mut self, now: Timestamp, window: u64) {
        self.0 = now.saturating_add(window);
    }

    /// True once `now` is strictly past the deadline.
    pub fn has_elapsed(self, now: Timestamp) -> bool {
        now > self.0
    }

    /// Rejects if the deadline has passed.
    pub fn ensure_open(self, now: Timestamp) -> Result<(), SessionError> {
        if self.has_elapsed(now) {
            return Err(SessionError::DeadlineElapsed {
                deadline: self.0,
                now,
            });
        }
        Ok(())
    }

    /// Rejects unless the deadline has passed.
    pub fn ensure_elapsed(self, now: Timestamp) -> Result<(), SessionError> {
        if !self.has_elapsed(now) {
            return Err(SessionError::DeadlineNotElapsed {
                deadline: self.0,
                now,
            });
        }
        Ok(())
    }
}

impl GameSession {
    /// Settles an abandoned game as a draw.
    ///
    /// Anyone may call this once the deadline has passed while the game is
    /// active, so an unresponsive opponent cannot lock the pot.
    #[instrument(skip(self, call, escrow, wallet), fields(session_id = %self.id(), caller = %call.caller))]
    pub fn force_timeout_settlement(
        &mut self,
        call: &Call,
        escrow: &mut Escrow,
        wallet: &mut dyn Wallet,
    ) -> Result<Vec<Event>, SessionError> {
        call.ensure_no_value()?;
        if !self.is_active() {
            warn!("Timeout requested with no active game");
            return Err(SessionError::NotActive);
        }
        self.deadline.ensure_elapsed(call.now()).inspect_err(|e| {
            warn!(error = %e, "Timeout requested too early");
        })?;

        let (Round::Playing(game), Some(players)) = (&self.round, self.players()) else {
            return Err(SessionError::NotActive);
        };
        let finished = game.clone().abandon();

        info!(deadline = self.deadline.time(), now = call.now(), "Settling abandoned game as draw");
        let mut events = vec![Event::GameOverWithDraw];
        events.extend(escrow.settle_draw(self.id(), players.both(), wallet));
        self.round = Round::Settled(finished);

        debug_assert!(self.audit(escrow).is_ok(), "{:?}", self.audit(escrow));
        Ok(events)
    }
}
