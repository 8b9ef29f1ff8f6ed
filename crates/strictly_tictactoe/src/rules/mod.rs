//! Game rules.
//!
//! Pure functions over the board, kept apart from storage so contracts and
//! invariants can reuse them.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::winning_line;
