//! Scripted call sequences replayed against an arena.
//!
//! A script is a TOML file with one `[[step]]` table per call:
//!
//! ```toml
//! session = "main"
//!
//! [[step]]
//! caller = "alice"
//! value = 100
//! height = 1
//! time = 0
//! action = "join_player1"
//!
//! [[step]]
//! caller = "alice"
//! height = 2
//! time = 10
//! action = "set_stone"
//! x = 1
//! y = 1
//! ```

use crate::arena::Arena;
use crate::call::{Amount, BlockInfo, Call, Identity, Timestamp};
use crate::config::ConfigError;
use crate::error::SessionError;
use crate::escrow::SessionId;
use crate::events::Event;
use crate::wallet::Wallet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

fn default_session() -> SessionId {
    "main".to_string()
}

/// Operation a step invokes.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, strum::IntoStaticStr,
)]
#[serde(tag = "action", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    /// Take seat 1.
    JoinPlayer1,
    /// Take seat 2.
    JoinPlayer2,
    /// Place a stone.
    SetStone {
        /// Row.
        x: u8,
        /// Column.
        y: u8,
    },
    /// Clear the session.
    ResetGame,
    /// Drain the caller's pending balance.
    WithdrawWin,
    /// Settle an abandoned game as a draw.
    EmergencyCashout,
}

/// One call in a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Calling identity.
    pub caller: Identity,
    /// Attached value.
    #[serde(default)]
    pub value: Amount,
    /// Block height.
    #[serde(default)]
    pub height: u64,
    /// Block time.
    #[serde(default)]
    pub time: Timestamp,
    /// Operation invoked.
    #[serde(flatten)]
    pub action: Action,
}

impl Step {
    /// The call context this step executes with.
    pub fn call(&self) -> Call {
        Call::new(
            self.caller.clone(),
            self.value,
            BlockInfo::new(self.height, self.time),
        )
    }

    /// Runs the step against one session of the arena.
    pub fn apply(
        &self,
        arena: &mut Arena,
        session: &str,
        wallet: &mut dyn Wallet,
    ) -> Result<Vec<Event>, SessionError> {
        let call = self.call();
        match self.action {
            Action::JoinPlayer1 => arena.join_game_as_player1(session, &call),
            Action::JoinPlayer2 => arena.join_game_as_player2(session, &call),
            Action::SetStone { x, y } => arena.set_stone(session, &call, x, y, wallet),
            Action::ResetGame => arena.reset_game(session, &call),
            Action::WithdrawWin => arena.withdraw_win(session, &call, wallet),
            Action::EmergencyCashout => arena.emergency_cashout(session, &call, wallet),
        }
    }
}

/// Result of one replayed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The call succeeded with these observations.
    Accepted {
        /// Observations emitted.
        events: Vec<Event>,
    },
    /// The call was rejected and changed nothing.
    Rejected {
        /// Rejection message.
        reason: String,
    },
}

/// Replay record for one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StepReport {
    /// Zero-based step index.
    pub index: usize,
    /// Calling identity.
    pub caller: Identity,
    /// Operation invoked.
    pub action: Action,
    /// What happened.
    pub outcome: StepOutcome,
}

/// A sequence of calls against one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Session the steps address.
    #[serde(default = "default_session")]
    pub session: SessionId,
    /// Steps in execution order.
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    /// Loads a script from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading script from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read script file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parses a script from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let script: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse script: {}", e)))?;
        info!(session = %script.session, steps = script.steps.len(), "Script loaded");
        Ok(script)
    }

    /// Replays every step in order. Rejections are recorded, not fatal.
    #[instrument(skip_all, fields(session = %self.session))]
    pub fn run(&self, arena: &mut Arena, wallet: &mut dyn Wallet) -> Vec<StepReport> {
        self.steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let outcome = match step.apply(arena, &self.session, wallet) {
                    Ok(events) => StepOutcome::Accepted { events },
                    Err(e) => {
                        let action: &'static str = (&step.action).into();
                        warn!(index, action, caller = %step.caller, error = %e, "Step rejected");
                        StepOutcome::Rejected {
                            reason: e.to_string(),
                        }
                    }
                };
                StepReport {
                    index,
                    caller: step.caller.clone(),
                    action: step.action.clone(),
                    outcome,
                }
            })
            .collect()
    }
}
