//! Grant model types: subjects, space roles, and grant sets

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Opaque identifier for a subject (a user or group UUID).
///
/// The platform assigns these; the engine never interprets the contents,
/// only compares for equality and uses them as map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    /// Create a UserId from a platform-assigned token
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    /// Get the raw string token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

/// Space-level access roles, in a strict total order: Admin > Editor > Viewer.
///
/// Wire names follow the platform API ("full", "edit", "view").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceRole {
    /// Full access, can manage grants and space settings
    #[serde(rename = "full")]
    Admin,
    /// Can edit space contents
    #[serde(rename = "edit")]
    Editor,
    /// Can view space contents
    #[serde(rename = "view")]
    Viewer,
}

impl SpaceRole {
    /// Precedence rank; a higher rank outranks a lower one
    pub fn precedence(&self) -> u8 {
        match self {
            SpaceRole::Admin => 2,
            SpaceRole::Editor => 1,
            SpaceRole::Viewer => 0,
        }
    }

    /// Wire name used by the platform API
    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceRole::Admin => "full",
            SpaceRole::Editor => "edit",
            SpaceRole::Viewer => "view",
        }
    }
}

impl PartialOrd for SpaceRole {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SpaceRole {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence().cmp(&other.precedence())
    }
}

impl fmt::Display for SpaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single access grant: a subject and its role on one space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceGrant {
    /// Subject the grant applies to
    pub user: UserId,

    /// Role the subject holds
    pub role: SpaceRole,
}

impl SpaceGrant {
    pub fn new(user: impl Into<UserId>, role: SpaceRole) -> Self {
        SpaceGrant {
            user: user.into(),
            role,
        }
    }
}

impl fmt::Display for SpaceGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user, self.role)
    }
}

/// A set of grants with one role per subject.
///
/// Backed by an ordered map so every iteration is ascending by subject
/// identifier; reconciliation logs and test output stay reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSet(BTreeMap<UserId, SpaceRole>);

impl GrantSet {
    /// Create an empty grant set
    pub fn new() -> Self {
        GrantSet(BTreeMap::new())
    }

    /// Insert or replace the role for a subject.
    ///
    /// Returns the previous role if the subject was already present.
    pub fn insert(&mut self, user: impl Into<UserId>, role: SpaceRole) -> Option<SpaceRole> {
        self.0.insert(user.into(), role)
    }

    /// Remove a subject's grant, returning its role if present
    pub fn remove(&mut self, user: &UserId) -> Option<SpaceRole> {
        self.0.remove(user)
    }

    /// Look up the role held by a subject
    pub fn role_of(&self, user: &UserId) -> Option<SpaceRole> {
        self.0.get(user).copied()
    }

    /// Check whether a subject holds any grant
    pub fn contains(&self, user: &UserId) -> bool {
        self.0.contains_key(user)
    }

    /// Number of subjects holding a grant
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no subject holds a grant
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate grants ascending by subject identifier
    pub fn iter(&self) -> impl Iterator<Item = (&UserId, SpaceRole)> {
        self.0.iter().map(|(user, role)| (user, *role))
    }

    /// Iterate subjects ascending by identifier
    pub fn subjects(&self) -> impl Iterator<Item = &UserId> {
        self.0.keys()
    }

    /// Materialize the grants, ascending by subject identifier
    pub fn grants(&self) -> Vec<SpaceGrant> {
        self.0
            .iter()
            .map(|(user, role)| SpaceGrant {
                user: user.clone(),
                role: *role,
            })
            .collect()
    }
}

impl FromIterator<(UserId, SpaceRole)> for GrantSet {
    fn from_iter<I: IntoIterator<Item = (UserId, SpaceRole)>>(iter: I) -> Self {
        // Later pairs win, preserving the one-role-per-subject invariant
        GrantSet(iter.into_iter().collect())
    }
}

impl FromIterator<SpaceGrant> for GrantSet {
    fn from_iter<I: IntoIterator<Item = SpaceGrant>>(iter: I) -> Self {
        iter.into_iter().map(|g| (g.user, g.role)).collect()
    }
}

impl fmt::Display for GrantSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (user, role)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}:{}", user, role)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_role_ordering() {
        assert!(SpaceRole::Admin > SpaceRole::Editor);
        assert!(SpaceRole::Editor > SpaceRole::Viewer);
        assert!(SpaceRole::Admin > SpaceRole::Viewer);
    }

    #[test]
    fn test_space_role_wire_names() {
        assert_eq!(SpaceRole::Admin.as_str(), "full");
        assert_eq!(SpaceRole::Editor.as_str(), "edit");
        assert_eq!(SpaceRole::Viewer.as_str(), "view");

        let json = serde_json::to_string(&SpaceRole::Admin).unwrap();
        assert_eq!(json, "\"full\"");
        let role: SpaceRole = serde_json::from_str("\"view\"").unwrap();
        assert_eq!(role, SpaceRole::Viewer);
    }

    #[test]
    fn test_grant_set_one_role_per_subject() {
        let mut grants = GrantSet::new();
        grants.insert("u1", SpaceRole::Viewer);
        let previous = grants.insert("u1", SpaceRole::Admin);

        assert_eq!(previous, Some(SpaceRole::Viewer));
        assert_eq!(grants.len(), 1);
        assert_eq!(grants.role_of(&UserId::from("u1")), Some(SpaceRole::Admin));
    }

    #[test]
    fn test_grant_set_iteration_is_ascending() {
        let grants: GrantSet = [
            SpaceGrant::new("charlie", SpaceRole::Viewer),
            SpaceGrant::new("alice", SpaceRole::Admin),
            SpaceGrant::new("bob", SpaceRole::Editor),
        ]
        .into_iter()
        .collect();

        let subjects: Vec<&str> = grants.subjects().map(|u| u.as_str()).collect();
        assert_eq!(subjects, vec!["alice", "bob", "charlie"]);
    }

    #[test]
    fn test_grant_set_from_iter_later_pair_wins() {
        let grants: GrantSet = [
            (UserId::from("u1"), SpaceRole::Viewer),
            (UserId::from("u1"), SpaceRole::Editor),
        ]
        .into_iter()
        .collect();

        assert_eq!(grants.len(), 1);
        assert_eq!(grants.role_of(&UserId::from("u1")), Some(SpaceRole::Editor));
    }

    #[test]
    fn test_grant_set_display() {
        let grants: GrantSet = [
            SpaceGrant::new("b", SpaceRole::Editor),
            SpaceGrant::new("a", SpaceRole::Admin),
        ]
        .into_iter()
        .collect();

        assert_eq!(format!("{}", grants), "{a:full, b:edit}");
    }
}
