//! Space data structures

use super::types::SpaceId;
use crate::core_grant::GrantSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Space visibility modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpaceVisibility {
    /// Visible to every project member
    Public,
    /// Visible only to subjects holding an explicit or inherited grant
    Restricted,
}

/// Derived interpretation of a space's access situation.
///
/// Not a stored tag: a Restricted space with exactly one effective grantee
/// (its creator) behaves as Private, one with more grantees as Shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessClass {
    Public,
    Private,
    Shared,
}

impl AccessClass {
    /// Derive the access class from visibility and the effective grantee count
    pub fn derive(visibility: SpaceVisibility, effective_grantees: usize) -> Self {
        match visibility {
            SpaceVisibility::Public => AccessClass::Public,
            SpaceVisibility::Restricted if effective_grantees <= 1 => AccessClass::Private,
            SpaceVisibility::Restricted => AccessClass::Shared,
        }
    }
}

impl fmt::Display for AccessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AccessClass::Public => "public",
            AccessClass::Private => "private",
            AccessClass::Shared => "shared",
        };
        write!(f, "{}", s)
    }
}

/// Position of a space in the nesting hierarchy.
///
/// A space is owned by at most one parent; a nested space inherits
/// visibility and group-level access from its root ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpacePosition {
    /// Top-level space, owns its visibility and group access
    Root,
    /// Owned by a parent space; restricted fields are inherited
    Nested { parent: SpaceId },
}

impl SpacePosition {
    pub fn is_root(&self) -> bool {
        matches!(self, SpacePosition::Root)
    }

    /// The parent reference, if any
    pub fn parent(&self) -> Option<SpaceId> {
        match self {
            SpacePosition::Root => None,
            SpacePosition::Nested { parent } => Some(*parent),
        }
    }
}

/// A space as the engine sees it for one reconciliation pass.
///
/// Transient: reconstructed per call from caller-supplied declared state
/// and freshly fetched effective state, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    /// Platform-assigned identity
    pub id: SpaceId,

    /// Display name
    pub name: String,

    /// Position in the nesting hierarchy
    pub position: SpacePosition,

    /// Current visibility (inherited from the root ancestor when nested)
    pub visibility: SpaceVisibility,
}

impl Space {
    /// Create a root space
    pub fn new_root(id: SpaceId, name: impl Into<String>, visibility: SpaceVisibility) -> Self {
        Space {
            id,
            name: name.into(),
            position: SpacePosition::Root,
            visibility,
        }
    }

    /// Create a nested space under `parent`
    pub fn new_nested(
        id: SpaceId,
        name: impl Into<String>,
        parent: SpaceId,
        visibility: SpaceVisibility,
    ) -> Self {
        Space {
            id,
            name: name.into(),
            position: SpacePosition::Nested { parent },
            visibility,
        }
    }

    pub fn is_root(&self) -> bool {
        self.position.is_root()
    }

    /// Derive the access class given the effective grant set
    pub fn access_class(&self, effective: &GrantSet) -> AccessClass {
        AccessClass::derive(self.visibility, effective.len())
    }
}

/// The operator's declared access configuration for one space.
///
/// `None` for an optional field means "not declared"; the validator only
/// flags fields the operator actually touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredAccess {
    /// Explicit per-subject grants the operator intends
    pub grants: GrantSet,

    /// Declared visibility, if the operator set one
    pub visibility: Option<SpaceVisibility>,

    /// Declared group-level access, if the operator set any
    pub group_access: Option<GrantSet>,
}

impl DeclaredAccess {
    /// Declaration containing only per-subject grants
    pub fn grants_only(grants: GrantSet) -> Self {
        DeclaredAccess {
            grants,
            visibility: None,
            group_access: None,
        }
    }
}
