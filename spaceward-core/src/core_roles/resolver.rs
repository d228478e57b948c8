//! Role precedence resolver.
//!
//! Operators declare project membership per role tier independently, so the
//! same identifier can appear in several tiers (and several times within
//! one tier). The platform gives each subject exactly one effective project
//! role; `resolve_unique` collapses the overlap deterministically by
//! precedence, while `normalize_tiers` only removes duplicates within each
//! tier. Both are total: any input of valid identifiers resolves without
//! error.

use super::role::ProjectRole;
use crate::core_grant::UserId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Declared membership for the five project role tiers, highest first.
///
/// Each sequence keeps the operator's declaration order; duplicates within
/// and across tiers are expected, legal input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierMembership {
    pub admins: Vec<UserId>,
    pub developers: Vec<UserId>,
    pub editors: Vec<UserId>,
    pub interactive_viewers: Vec<UserId>,
    pub viewers: Vec<UserId>,
}

impl TierMembership {
    /// Create an empty membership declaration
    pub fn new() -> Self {
        Self::default()
    }

    /// The declared sequence for one tier
    pub fn tier(&self, role: ProjectRole) -> &[UserId] {
        match role {
            ProjectRole::Admin => &self.admins,
            ProjectRole::Developer => &self.developers,
            ProjectRole::Editor => &self.editors,
            ProjectRole::InteractiveViewer => &self.interactive_viewers,
            ProjectRole::Viewer => &self.viewers,
        }
    }

    fn tier_mut(&mut self, role: ProjectRole) -> &mut Vec<UserId> {
        match role {
            ProjectRole::Admin => &mut self.admins,
            ProjectRole::Developer => &mut self.developers,
            ProjectRole::Editor => &mut self.editors,
            ProjectRole::InteractiveViewer => &mut self.interactive_viewers,
            ProjectRole::Viewer => &mut self.viewers,
        }
    }

    /// True if no tier declares any identifier
    pub fn is_empty(&self) -> bool {
        ProjectRole::ORDERED.iter().all(|r| self.tier(*r).is_empty())
    }

    /// Total number of declared entries, duplicates included
    pub fn declared_len(&self) -> usize {
        ProjectRole::ORDERED.iter().map(|r| self.tier(*r).len()).sum()
    }

    /// Assign every identifier to exactly one tier: its highest-precedence
    /// declared tier.
    ///
    /// Output tiers are deduplicated and jointly partition the set of all
    /// declared identifiers. Within each output tier, relative order follows
    /// first occurrence in that tier's input sequence.
    pub fn resolve_unique(&self) -> TierMembership {
        let mut highest: HashMap<&UserId, ProjectRole> = HashMap::new();
        for role in ProjectRole::ORDERED {
            for user in self.tier(role) {
                highest.entry(user).or_insert(role);
            }
        }

        let mut resolved = TierMembership::new();
        for role in ProjectRole::ORDERED {
            let mut emitted: HashSet<&UserId> = HashSet::new();
            for user in self.tier(role) {
                if highest[user] == role && emitted.insert(user) {
                    resolved.tier_mut(role).push(user.clone());
                }
            }
        }
        resolved
    }

    /// Deduplicate each tier independently, without cross-tier elevation.
    ///
    /// An identifier declared in multiple tiers stays present in each of
    /// them; only repeats within a single tier are dropped.
    pub fn normalize_tiers(&self) -> TierMembership {
        let mut normalized = TierMembership::new();
        for role in ProjectRole::ORDERED {
            let mut emitted: HashSet<&UserId> = HashSet::new();
            for user in self.tier(role) {
                if emitted.insert(user) {
                    normalized.tier_mut(role).push(user.clone());
                }
            }
        }
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(ids: &[&str]) -> Vec<UserId> {
        ids.iter().map(|id| UserId::from(*id)).collect()
    }

    #[test]
    fn test_resolve_unique_highest_tier_wins() {
        // admins=[a1,a2,a2], developers=[a1,d1,d2,d2], rest empty
        let declared = TierMembership {
            admins: users(&["a1", "a2", "a2"]),
            developers: users(&["a1", "d1", "d2", "d2"]),
            ..Default::default()
        };

        let resolved = declared.resolve_unique();
        assert_eq!(resolved.admins, users(&["a1", "a2"]));
        assert_eq!(resolved.developers, users(&["d1", "d2"]));
        assert!(resolved.editors.is_empty());
        assert!(resolved.interactive_viewers.is_empty());
        assert!(resolved.viewers.is_empty());
    }

    #[test]
    fn test_resolve_unique_empty_input() {
        let resolved = TierMembership::new().resolve_unique();
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_resolve_unique_partitions_input() {
        let declared = TierMembership {
            admins: users(&["x"]),
            developers: users(&["y", "x"]),
            editors: users(&["z", "y"]),
            interactive_viewers: users(&["z"]),
            viewers: users(&["x", "y", "z", "w"]),
        };

        let resolved = declared.resolve_unique();
        let mut seen: HashSet<&UserId> = HashSet::new();
        for role in ProjectRole::ORDERED {
            for user in resolved.tier(role) {
                assert!(seen.insert(user), "{} assigned to more than one tier", user);
            }
        }
        assert_eq!(seen.len(), 4);
        assert_eq!(resolved.admins, users(&["x"]));
        assert_eq!(resolved.developers, users(&["y"]));
        assert_eq!(resolved.editors, users(&["z"]));
        assert_eq!(resolved.viewers, users(&["w"]));
    }

    #[test]
    fn test_resolve_unique_preserves_first_occurrence_order() {
        let declared = TierMembership {
            viewers: users(&["v3", "v1", "v3", "v2", "v1"]),
            ..Default::default()
        };

        let resolved = declared.resolve_unique();
        assert_eq!(resolved.viewers, users(&["v3", "v1", "v2"]));
    }

    #[test]
    fn test_normalize_tiers_dedups_within_tier_only() {
        let declared = TierMembership {
            admins: users(&["a1", "a1"]),
            developers: users(&["a1", "d1"]),
            ..Default::default()
        };

        let normalized = declared.normalize_tiers();
        // a1 stays in both tiers: no cross-tier elevation
        assert_eq!(normalized.admins, users(&["a1"]));
        assert_eq!(normalized.developers, users(&["a1", "d1"]));
    }

    #[test]
    fn test_normalize_tiers_adjacent_and_separated_duplicates() {
        let declared = TierMembership {
            editors: users(&["e1", "e1", "e2", "e1", "e3", "e2"]),
            ..Default::default()
        };

        let normalized = declared.normalize_tiers();
        assert_eq!(normalized.editors, users(&["e1", "e2", "e3"]));
    }

    #[test]
    fn test_normalize_tiers_never_moves_identifiers() {
        let declared = TierMembership {
            admins: users(&["a"]),
            viewers: users(&["a", "b"]),
            ..Default::default()
        };

        let normalized = declared.normalize_tiers();
        for role in ProjectRole::ORDERED {
            for user in normalized.tier(role) {
                assert!(
                    declared.tier(role).contains(user),
                    "{} appeared in a tier it was not declared in",
                    user
                );
            }
        }
    }
}
