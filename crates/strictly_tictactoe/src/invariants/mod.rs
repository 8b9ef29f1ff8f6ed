//! Properties re-checked after every state change.
//!
//! A move runs [`BoardInvariants`] as its postcondition. The staking crate
//! describes its session-plus-funds state with the same traits, so both
//! report failures as [`InvariantViolation`]s naming the broken property and
//! the call site that caught it.

use std::panic::Location;

/// A property of `S` that every reachable state satisfies.
pub trait Invariant<S> {
    /// True if `state` satisfies the property.
    fn holds(state: &S) -> bool;

    /// One-line statement of the property.
    fn description() -> &'static str;
}

/// A property that failed, and where it was checked.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("{invariant} violated at {file}:{line}: {description}")]
pub struct InvariantViolation {
    /// Type name of the failed invariant.
    pub invariant: &'static str,
    /// Statement of the property.
    pub description: &'static str,
    /// Source file of the `check_all` call.
    pub file: &'static str,
    /// Line of the `check_all` call.
    pub line: u32,
}

impl InvariantViolation {
    /// Records a failure of `I` observed at `checked_at`.
    pub fn of<S, I: Invariant<S>>(checked_at: &'static Location<'static>) -> Self {
        let path = std::any::type_name::<I>();
        Self {
            invariant: path.rsplit("::").next().unwrap_or(path),
            description: I::description(),
            file: checked_at.file(),
            line: checked_at.line(),
        }
    }
}

/// Invariants checked together. Implemented for tuples of two or three.
pub trait InvariantSet<S> {
    /// Checks every member, collecting all failures rather than stopping at
    /// the first.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! invariant_tuple {
    ($($inv:ident),+) => {
        impl<S, $($inv: Invariant<S>),+> InvariantSet<S> for ($($inv,)+) {
            #[track_caller]
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let checked_at = Location::caller();
                let mut violations = Vec::new();
                $(
                    if !<$inv as Invariant<S>>::holds(state) {
                        violations.push(InvariantViolation::of::<S, $inv>(checked_at));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

invariant_tuple!(A, B);
invariant_tuple!(A, B, C);

pub mod alternating_turn;
pub mod history_consistent;
pub mod monotonic_board;

pub use alternating_turn::AlternatingTurnInvariant;
pub use history_consistent::HistoryConsistentInvariant;
pub use monotonic_board::MonotonicBoardInvariant;

/// All board invariants as a composable set.
pub type BoardInvariants = (
    MonotonicBoardInvariant,
    AlternatingTurnInvariant,
    HistoryConsistentInvariant,
);
