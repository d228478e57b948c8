//! Grant Set Model
//!
//! Data structures for declared vs. effective space access: subjects,
//! roles, grant sets with one role per subject, and the pure set-diff
//! that drives reconciliation.
//!
//! Declared and effective state are always two explicit snapshots passed
//! into `diff`, never a stateful object that mutates itself across calls.

pub mod diff;
pub mod types;

pub use diff::{diff, GrantDiff};
pub use types::{GrantSet, SpaceGrant, SpaceRole, UserId};
