//! Many sessions backed by one escrow.

use crate::call::{Amount, Call, Identity};
use crate::config::TableConfig;
use crate::error::SessionError;
use crate::escrow::{Escrow, SessionId};
use crate::events::Event;
use crate::session::{GameSession, GameView};
use crate::wallet::Wallet;
use std::collections::BTreeMap;
use strictly_tictactoe::Seat;
use tracing::{debug, info, instrument, warn};

/// Hosts game sessions by id and holds their stakes.
#[derive(Debug, Clone, Default)]
pub struct Arena {
    sessions: BTreeMap<SessionId, GameSession>,
    escrow: Escrow,
}

impl Arena {
    /// Creates an arena with no sessions.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating arena");
        Self::default()
    }

    /// Opens a new, empty session.
    #[instrument(skip(self, config))]
    pub fn open_session(
        &mut self,
        id: impl Into<SessionId> + std::fmt::Debug,
        config: TableConfig,
    ) -> Result<SessionId, SessionError> {
        let id = id.into();
        if self.sessions.contains_key(&id) {
            warn!(session_id = %id, "Session already exists");
            return Err(SessionError::SessionExists { id });
        }
        self.sessions
            .insert(id.clone(), GameSession::new(id.clone(), config));
        info!(session_id = %id, "Opened session");
        Ok(id)
    }

    /// Looks up a session.
    pub fn session(&self, id: &str) -> Result<&GameSession, SessionError> {
        self.sessions.get(id).ok_or_else(|| {
            debug!(session_id = id, "Session not found");
            SessionError::UnknownSession { id: id.to_string() }
        })
    }

    /// Splits the borrow into one session and the shared escrow.
    fn session_mut(&mut self, id: &str) -> Result<(&mut GameSession, &mut Escrow), SessionError> {
        match self.sessions.get_mut(id) {
            Some(session) => Ok((session, &mut self.escrow)),
            None => {
                debug!(session_id = id, "Session not found");
                Err(SessionError::UnknownSession { id: id.to_string() })
            }
        }
    }

    /// Ids of all sessions, in order.
    pub fn session_ids(&self) -> impl Iterator<Item = &SessionId> {
        self.sessions.keys()
    }

    /// The shared escrow.
    pub fn escrow(&self) -> &Escrow {
        &self.escrow
    }

    /// Takes seat 1 of a session.
    pub fn join_game_as_player1(&mut self, id: &str, call: &Call) -> Result<Vec<Event>, SessionError> {
        let (session, escrow) = self.session_mut(id)?;
        session.join(Seat::Player1, call, escrow)
    }

    /// Takes seat 2 of a session.
    pub fn join_game_as_player2(&mut self, id: &str, call: &Call) -> Result<Vec<Event>, SessionError> {
        let (session, escrow) = self.session_mut(id)?;
        session.join(Seat::Player2, call, escrow)
    }

    /// Places the caller's stone at row `x`, column `y`.
    pub fn set_stone(
        &mut self,
        id: &str,
        call: &Call,
        x: u8,
        y: u8,
        wallet: &mut dyn Wallet,
    ) -> Result<Vec<Event>, SessionError> {
        let (session, escrow) = self.session_mut(id)?;
        session.set_stone(call, x, y, escrow, wallet)
    }

    /// Clears a finished or unstarted session.
    pub fn reset_game(&mut self, id: &str, call: &Call) -> Result<Vec<Event>, SessionError> {
        let (session, escrow) = self.session_mut(id)?;
        session.reset(call, escrow)
    }

    /// Pays out the caller's pending balance for a session.
    #[instrument(skip(self, call, wallet), fields(caller = %call.caller))]
    pub fn withdraw_win(
        &mut self,
        id: &str,
        call: &Call,
        wallet: &mut dyn Wallet,
    ) -> Result<Vec<Event>, SessionError> {
        call.ensure_no_value()?;
        let (session, escrow) = self.session_mut(id)?;
        let amount = escrow.withdraw(session.id(), &call.caller, wallet)?;
        debug_assert!(session.audit(escrow).is_ok(), "{:?}", session.audit(escrow));
        Ok(vec![Event::PayoutSuccess {
            receiver: call.caller.clone(),
            amount,
        }])
    }

    /// Settles an abandoned session as a draw. Open to any caller.
    pub fn emergency_cashout(
        &mut self,
        id: &str,
        call: &Call,
        wallet: &mut dyn Wallet,
    ) -> Result<Vec<Event>, SessionError> {
        let (session, escrow) = self.session_mut(id)?;
        session.force_timeout_settlement(call, escrow, wallet)
    }

    /// Snapshot of a session.
    pub fn view(&self, id: &str) -> Result<GameView, SessionError> {
        Ok(self.session(id)?.view(&self.escrow))
    }

    /// What `who` may withdraw from a session.
    pub fn pending_withdrawal(&self, id: &str, who: &Identity) -> Result<Amount, SessionError> {
        let session = self.session(id)?;
        Ok(self.escrow.pending_withdrawal(session.id(), who))
    }
}
