//! Test fixtures for creating common test objects
//!
//! Factory functions and builders for spaces and grant sets, shared by
//! unit and integration tests.

use crate::core_grant::{GrantSet, SpaceRole, UserId};
use crate::core_space::{Space, SpaceId, SpaceVisibility};

/// Shorthand for a UserId from a literal
pub fn user(id: &str) -> UserId {
    UserId::from(id)
}

/// Build a grant set from (subject, role) pairs
pub fn grant_set(pairs: &[(&str, SpaceRole)]) -> GrantSet {
    pairs
        .iter()
        .map(|(user, role)| (UserId::from(*user), *role))
        .collect()
}

/// Builder for test spaces
pub struct TestSpaceBuilder {
    id: SpaceId,
    name: String,
    parent: Option<SpaceId>,
    visibility: SpaceVisibility,
}

impl TestSpaceBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SpaceId::generate(),
            name: name.into(),
            parent: None,
            visibility: SpaceVisibility::Restricted,
        }
    }

    pub fn with_id(mut self, id: SpaceId) -> Self {
        self.id = id;
        self
    }

    pub fn nested_under(mut self, parent: SpaceId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn public(mut self) -> Self {
        self.visibility = SpaceVisibility::Public;
        self
    }

    pub fn restricted(mut self) -> Self {
        self.visibility = SpaceVisibility::Restricted;
        self
    }

    pub fn build(self) -> Space {
        match self.parent {
            Some(parent) => Space::new_nested(self.id, self.name, parent, self.visibility),
            None => Space::new_root(self.id, self.name, self.visibility),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_builder_defaults() {
        let space = TestSpaceBuilder::new("team").build();
        assert!(space.is_root());
        assert_eq!(space.visibility, SpaceVisibility::Restricted);
    }

    #[test]
    fn test_space_builder_nested() {
        let parent = SpaceId::generate();
        let space = TestSpaceBuilder::new("child").nested_under(parent).build();
        assert_eq!(space.position.parent(), Some(parent));
    }
}
