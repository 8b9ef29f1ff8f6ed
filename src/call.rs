//! Caller identities and the per-operation call context.

use crate::error::SessionError;
use derive_new::new;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Native-currency amount in base units.
pub type Amount = u64;

/// Seconds since the Unix epoch, as reported by the execution environment.
pub type Timestamp = u64;

/// Opaque caller handle used for authorization and payout addressing.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wraps a caller handle.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Returns the raw handle.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identity {
    fn from(handle: &str) -> Self {
        Self::new(handle)
    }
}

/// Environment facts observed by one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, new)]
pub struct BlockInfo {
    /// Block height. Its parity seeds the first mover.
    pub height: u64,
    /// Block time.
    pub time: Timestamp,
}

/// One state-transition request: who is calling, what value they attached,
/// and the block it executes in.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Call {
    /// The calling identity.
    pub caller: Identity,
    /// Native currency attached to the call.
    pub value: Amount,
    /// Environment facts.
    pub block: BlockInfo,
}

impl Call {
    /// A call that attaches no value.
    pub fn plain(caller: impl Into<Identity>, block: BlockInfo) -> Self {
        Self::new(caller.into(), 0, block)
    }

    /// Block time of the call.
    pub fn now(&self) -> Timestamp {
        self.block.time
    }

    /// Rejects value attached to an operation that takes none.
    pub fn ensure_no_value(&self) -> Result<(), SessionError> {
        if self.value != 0 {
            return Err(SessionError::UnexpectedValue { value: self.value });
        }
        Ok(())
    }
}
