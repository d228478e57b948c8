//! Project-level role tiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Project-level roles, in a strict total order:
/// Admin > Developer > Editor > InteractiveViewer > Viewer.
///
/// Each subject holds exactly one effective project role; when membership
/// is declared per tier the precedence resolver collapses overlaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRole {
    Admin,
    Developer,
    Editor,
    InteractiveViewer,
    Viewer,
}

impl ProjectRole {
    /// All tiers, highest precedence first
    pub const ORDERED: [ProjectRole; 5] = [
        ProjectRole::Admin,
        ProjectRole::Developer,
        ProjectRole::Editor,
        ProjectRole::InteractiveViewer,
        ProjectRole::Viewer,
    ];

    /// Precedence rank; a higher rank outranks a lower one
    pub fn precedence(&self) -> u8 {
        match self {
            ProjectRole::Admin => 4,
            ProjectRole::Developer => 3,
            ProjectRole::Editor => 2,
            ProjectRole::InteractiveViewer => 1,
            ProjectRole::Viewer => 0,
        }
    }

    /// Wire name used by the platform API
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Admin => "admin",
            ProjectRole::Developer => "developer",
            ProjectRole::Editor => "editor",
            ProjectRole::InteractiveViewer => "interactive_viewer",
            ProjectRole::Viewer => "viewer",
        }
    }

    /// True if this role outranks `other`
    pub fn outranks(&self, other: &ProjectRole) -> bool {
        self.precedence() > other.precedence()
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
