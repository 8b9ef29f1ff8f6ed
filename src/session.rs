//! Seating, play and reset of one stake-backed game.

use crate::call::{Amount, Call, Identity, Timestamp};
use crate::config::TableConfig;
use crate::error::SessionError;
use crate::escrow::{Escrow, SessionId};
use crate::events::Event;
use crate::invariants::{SessionAudit, SessionInvariants};
use crate::timeout::Deadline;
use crate::wallet::Wallet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strictly_tictactoe::{
    Board, GameFinished, GameInProgress, GameResult, GameSetup, InvariantSet, InvariantViolation,
    Move, Outcome, Position, Seat, Square,
};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

/// Both seated identities, borrowed from a session whose seats are full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Players<'a> {
    player1: &'a Identity,
    player2: &'a Identity,
}

impl<'a> Players<'a> {
    /// Pairs the seat slots, if both are taken.
    pub(crate) fn seated(
        player1: &'a Option<Identity>,
        player2: &'a Option<Identity>,
    ) -> Option<Self> {
        Some(Self {
            player1: player1.as_ref()?,
            player2: player2.as_ref()?,
        })
    }

    /// Identity in the given seat.
    pub fn get(self, seat: Seat) -> &'a Identity {
        match seat {
            Seat::Player1 => self.player1,
            Seat::Player2 => self.player2,
        }
    }

    /// Both identities, Player1 first.
    pub fn both(self) -> [&'a Identity; 2] {
        [self.player1, self.player2]
    }
}

/// Board state of the current round. Who sits where lives in the session's
/// seat slots.
#[derive(Debug, Clone)]
pub(crate) enum Round {
    /// Seats filling up; the board is empty.
    Open(GameSetup),
    /// Both seats filled and moves accepted.
    Playing(GameInProgress),
    /// Round over and paid out; waiting for a reset.
    Settled(GameFinished),
}

impl Round {
    pub(crate) fn fresh() -> Self {
        Round::Open(GameSetup::new())
    }

    fn board(&self) -> &Board {
        match self {
            Round::Open(setup) => setup.board(),
            Round::Playing(game) => game.board(),
            Round::Settled(game) => game.board(),
        }
    }
}

/// Lifecycle phase of a session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, derive_more::Display,
)]
pub enum Phase {
    /// No seat taken.
    Empty,
    /// One seat taken.
    AwaitingSecondPlayer,
    /// Both seats taken, moves accepted.
    Active,
    /// Round finished and paid out.
    Settled,
}

/// Read-only snapshot of everything a UI renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GameView {
    /// Session id.
    pub session: SessionId,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Player in seat 1.
    pub player1: Option<Identity>,
    /// Player in seat 2.
    pub player2: Option<Identity>,
    /// Player allowed to move next, while active.
    pub active_player: Option<Identity>,
    /// Rows of the board, indexed by `x`.
    pub board: Vec<Vec<Square>>,
    /// Stones placed this round.
    pub move_counter: usize,
    /// Whether moves are accepted.
    pub game_active: bool,
    /// Time after which the game may be settled by timeout.
    pub deadline: Timestamp,
    /// Exact value needed to join.
    pub entry_stake: Amount,
    /// Stakes held for this session.
    pub pot: Amount,
}

/// One stake-backed game between two identities.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    config: TableConfig,
    pub(crate) player1: Option<Identity>,
    pub(crate) player2: Option<Identity>,
    pub(crate) round: Round,
    first_mover: Seat,
    pub(crate) deadline: Deadline,
}

impl GameSession {
    /// Creates an empty session.
    #[instrument(skip(config))]
    pub fn new(id: SessionId, config: TableConfig) -> Self {
        info!(session_id = %id, entry_stake = *config.entry_stake(), "Creating new game session");
        Self {
            id,
            config,
            player1: None,
            player2: None,
            round: Round::fresh(),
            first_mover: Seat::Player1,
            deadline: Deadline::default(),
        }
    }

    /// Session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Table configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Identity in the given seat.
    pub fn player(&self, seat: Seat) -> Option<&Identity> {
        match seat {
            Seat::Player1 => self.player1.as_ref(),
            Seat::Player2 => self.player2.as_ref(),
        }
    }

    /// Both players, once both seats are taken.
    pub fn players(&self) -> Option<Players<'_>> {
        Players::seated(&self.player1, &self.player2)
    }

    fn slot_mut(&mut self, seat: Seat) -> &mut Option<Identity> {
        match seat {
            Seat::Player1 => &mut self.player1,
            Seat::Player2 => &mut self.player2,
        }
    }

    /// Seat held by `who`, if any.
    pub fn seat_of(&self, who: &Identity) -> Option<Seat> {
        Seat::iter().find(|seat| self.player(*seat) == Some(who))
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        match &self.round {
            Round::Playing(_) => Phase::Active,
            Round::Settled(_) => Phase::Settled,
            Round::Open(_) if self.player1.is_none() && self.player2.is_none() => Phase::Empty,
            Round::Open(_) => Phase::AwaitingSecondPlayer,
        }
    }

    /// True while moves are accepted.
    pub fn is_active(&self) -> bool {
        matches!(self.round, Round::Playing(_))
    }

    /// Player allowed to move next, while active.
    pub fn active_player(&self) -> Option<&Identity> {
        match &self.round {
            Round::Playing(game) => self.player(game.to_move()),
            _ => None,
        }
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        self.round.board()
    }

    /// Stones placed this round.
    pub fn move_counter(&self) -> usize {
        match &self.round {
            Round::Open(_) => 0,
            Round::Playing(game) => game.move_counter(),
            Round::Settled(game) => game.history().len(),
        }
    }

    /// Current deadline.
    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Outcome of the settled round, if any.
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.round {
            Round::Settled(game) => Some(game.outcome()),
            _ => None,
        }
    }

    /// Snapshot for display.
    pub fn view(&self, escrow: &Escrow) -> GameView {
        GameView {
            session: self.id.clone(),
            phase: self.phase(),
            player1: self.player1.clone(),
            player2: self.player2.clone(),
            active_player: self.active_player().cloned(),
            board: self.board().rows(),
            move_counter: self.move_counter(),
            game_active: self.is_active(),
            deadline: self.deadline.time(),
            entry_stake: *self.config.entry_stake(),
            pot: escrow.pot(&self.id),
        }
    }

    /// Checks the session invariants against the escrow.
    pub fn audit(&self, escrow: &Escrow) -> Result<(), Vec<InvariantViolation>> {
        SessionInvariants::check_all(&SessionAudit::new(self, escrow))
    }

    /// Takes `seat` for the caller, who must attach exactly the entry stake.
    ///
    /// The first mover is recomputed from the block height on every join;
    /// the value seen by the second join decides who opens.
    #[instrument(skip(self, call, escrow), fields(session_id = %self.id, caller = %call.caller))]
    pub fn join(
        &mut self,
        seat: Seat,
        call: &Call,
        escrow: &mut Escrow,
    ) -> Result<Vec<Event>, SessionError> {
        if self.seat_of(&call.caller).is_some() {
            warn!("Caller already holds a seat");
            return Err(SessionError::AlreadyJoined {
                caller: call.caller.clone(),
            });
        }
        if self.player(seat).is_some() {
            warn!(%seat, "Seat already taken");
            return Err(SessionError::SeatTaken { seat });
        }
        let stake = *self.config.entry_stake();
        if call.value != stake {
            warn!(expected = stake, got = call.value, "Wrong stake");
            return Err(SessionError::WrongStake {
                expected: stake,
                got: call.value,
            });
        }
        escrow.collect_stake(&self.id, call.value)?;

        *self.slot_mut(seat) = Some(call.caller.clone());
        self.first_mover = Seat::from_parity(call.block.height);
        self.deadline
            .extend(call.now(), *self.config.reaction_window_secs());
        info!(
            %seat,
            first_mover = %self.first_mover,
            deadline = self.deadline.time(),
            "Player joined"
        );

        let mut events = vec![Event::PlayerJoined {
            seat,
            player: call.caller.clone(),
        }];

        if let Some(players) = Players::seated(&self.player1, &self.player2) {
            let opener = players.get(self.first_mover).clone();
            info!(%opener, "Both seats filled, game active");
            self.round = Round::Playing(GameSetup::new().start(self.first_mover));
            events.push(Event::NextPlayer { player: opener });
        }

        debug_assert!(self.audit(escrow).is_ok(), "{:?}", self.audit(escrow));
        Ok(events)
    }

    /// Places the caller's stone at row `x`, column `y`.
    ///
    /// A completed line pays the pot to the mover; a full board without one
    /// splits it. Otherwise the turn passes.
    #[instrument(skip(self, call, escrow, wallet), fields(session_id = %self.id, caller = %call.caller))]
    pub fn set_stone(
        &mut self,
        call: &Call,
        x: u8,
        y: u8,
        escrow: &mut Escrow,
        wallet: &mut dyn Wallet,
    ) -> Result<Vec<Event>, SessionError> {
        call.ensure_no_value()?;
        let (Round::Playing(game), Some(players)) = (
            &self.round,
            Players::seated(&self.player1, &self.player2),
        ) else {
            warn!("Move with no active game");
            return Err(SessionError::NotActive);
        };
        self.deadline.ensure_open(call.now()).inspect_err(|e| {
            warn!(error = %e, "Move after deadline");
        })?;
        let to_move = game.to_move();
        if players.get(to_move) != &call.caller {
            warn!(to_move = %players.get(to_move), "Move out of turn");
            return Err(SessionError::NotYourTurn {
                caller: call.caller.clone(),
            });
        }
        let position = Position::new(x, y)?;
        let result = game.clone().make_move(Move::new(to_move, position))?;

        self.deadline
            .extend(call.now(), *self.config.reaction_window_secs());

        match result {
            GameResult::InProgress(game) => {
                let next = players.get(game.to_move()).clone();
                debug!(%position, %next, moves = game.move_counter(), "Stone placed");
                self.round = Round::Playing(game);
                Ok(vec![Event::NextPlayer { player: next }])
            }
            GameResult::Finished(game) => {
                let outcome = *game.outcome();
                info!(%position, %outcome, "Round finished");
                self.round = Round::Settled(game);

                let events = match outcome.winner() {
                    Some(seat) => {
                        let winner = players.get(seat);
                        let mut events = vec![Event::GameOverWithWin {
                            winner: winner.clone(),
                        }];
                        events.extend(escrow.settle_win(&self.id, winner, wallet));
                        events
                    }
                    None => {
                        let mut events = vec![Event::GameOverWithDraw];
                        events.extend(escrow.settle_draw(&self.id, players.both(), wallet));
                        events
                    }
                };

                debug_assert!(self.audit(escrow).is_ok(), "{:?}", self.audit(escrow));
                Ok(events)
            }
        }
    }

    /// Clears the board and both seats. Pending withdrawals are untouched.
    ///
    /// Rejected while a game is active: abandoned games go through the
    /// timeout instead. A stake still sitting in an unplayed session is moved
    /// to its owner's pending withdrawal.
    #[instrument(skip(self, call, escrow), fields(session_id = %self.id, caller = %call.caller))]
    pub fn reset(&mut self, call: &Call, escrow: &mut Escrow) -> Result<Vec<Event>, SessionError> {
        call.ensure_no_value()?;
        if self.seat_of(&call.caller).is_none() {
            warn!("Reset by non-player");
            return Err(SessionError::NotAPlayer {
                caller: call.caller.clone(),
            });
        }
        if self.is_active() {
            warn!("Reset while game active");
            return Err(SessionError::ResetWhileActive);
        }

        let mut events = Vec::new();
        if matches!(self.round, Round::Open(_)) {
            let stake = *self.config.entry_stake();
            for seated in Seat::iter().filter_map(|seat| self.player(seat)) {
                events.extend(escrow.refund_to_pending(&self.id, seated, stake));
            }
        }

        self.player1 = None;
        self.player2 = None;
        self.round = Round::fresh();
        info!("Session reset");
        events.push(Event::GameReset {
            by: call.caller.clone(),
        });

        debug_assert!(self.audit(escrow).is_ok(), "{:?}", self.audit(escrow));
        Ok(events)
    }
}
