//! Set-diff between a desired and a current grant set.
//!
//! The diff is the pure half of reconciliation: given two snapshots it
//! produces the additions, role updates, and removals that converge the
//! current set toward the desired one. Removals are only ever computed
//! against the set the caller passes as `current`; the reconciler passes
//! the previously declared set here, never the full effective set, so
//! inherited and auto-added grants are never removal targets.

use super::types::{GrantSet, SpaceGrant, UserId};

/// The operations needed to converge `current` toward `desired`.
///
/// All three collections are ascending by subject identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrantDiff {
    /// Grants for subjects absent from the current set
    pub to_add: Vec<SpaceGrant>,

    /// Grants for subjects present in both sets but with a different role
    pub to_update: Vec<SpaceGrant>,

    /// Subjects present in the current set but absent from the desired set
    pub to_remove: Vec<UserId>,
}

impl GrantDiff {
    /// True if no operation is needed
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_update.is_empty() && self.to_remove.is_empty()
    }

    /// Total number of planned operations
    pub fn op_count(&self) -> usize {
        self.to_add.len() + self.to_update.len() + self.to_remove.len()
    }
}

/// Compute the minimal operation set converging `current` toward `desired`.
pub fn diff(desired: &GrantSet, current: &GrantSet) -> GrantDiff {
    let mut out = GrantDiff::default();

    for (user, role) in desired.iter() {
        match current.role_of(user) {
            None => out.to_add.push(SpaceGrant {
                user: user.clone(),
                role,
            }),
            Some(held) if held != role => out.to_update.push(SpaceGrant {
                user: user.clone(),
                role,
            }),
            Some(_) => {}
        }
    }

    for user in current.subjects() {
        if !desired.contains(user) {
            out.to_remove.push(user.clone());
        }
    }

    out
}
