//! Inheritance validator.
//!
//! Determines which declared fields are legal for a space given its
//! position in the nesting hierarchy. Nested spaces inherit visibility and
//! group-level access from their root ancestor; the platform silently
//! ignores edits to those fields, so declaring them is flagged as a
//! non-fatal configuration mismatch rather than failing the operation;
//! blocking would prevent benign re-application of unchanged configuration.
//! Deleting a space that still has descendants is always fatal.

use super::space::{DeclaredAccess, Space};
use super::types::SpaceId;
use thiserror::Error;
use tracing::warn;

/// Restricted fields a nested space inherits from its root ancestor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestrictedField {
    Visibility,
    GroupAccess,
}

impl RestrictedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestrictedField::Visibility => "visibility",
            RestrictedField::GroupAccess => "group_access",
        }
    }
}

impl std::fmt::Display for RestrictedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Non-fatal validation findings, surfaced for operator awareness
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// A restricted field was declared on a nested space; the platform
    /// ignores the edit
    RestrictedFieldIgnored {
        space: SpaceId,
        field: RestrictedField,
    },

    /// A move makes the space adopt the new parent's visibility and group
    /// access; expected side effect, not drift
    MoveInheritance {
        space: SpaceId,
        new_parent: SpaceId,
    },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationWarning::RestrictedFieldIgnored { space, field } => write!(
                f,
                "space {} is nested: declared {} is inherited from the root ancestor and the platform ignores the edit",
                space, field
            ),
            ValidationWarning::MoveInheritance { space, new_parent } => write!(
                f,
                "moving space {} under {} discards its visibility and group access in favor of the new parent's",
                space, new_parent
            ),
        }
    }
}

/// Fatal pre-flight validation failures
#[derive(Debug, Error)]
pub enum ValidationRejected {
    #[error("cannot delete space {space}: {descendants} descendant space(s) still exist; delete or move them in a separate, explicit step first")]
    DeleteWithDescendants { space: SpaceId, descendants: usize },
}

/// Outcome of a non-rejecting validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// No restricted field touched
    Accepted,
    /// Restricted fields touched on a nested space; operation proceeds
    AcceptedWithWarnings(Vec<ValidationWarning>),
}

impl ValidationOutcome {
    fn from_warnings(warnings: Vec<ValidationWarning>) -> Self {
        if warnings.is_empty() {
            ValidationOutcome::Accepted
        } else {
            ValidationOutcome::AcceptedWithWarnings(warnings)
        }
    }

    /// The collected warnings, empty when accepted cleanly
    pub fn warnings(&self) -> &[ValidationWarning] {
        match self {
            ValidationOutcome::Accepted => &[],
            ValidationOutcome::AcceptedWithWarnings(w) => w,
        }
    }

    /// Consume the outcome, yielding its warnings
    pub fn into_warnings(self) -> Vec<ValidationWarning> {
        match self {
            ValidationOutcome::Accepted => Vec::new(),
            ValidationOutcome::AcceptedWithWarnings(w) => w,
        }
    }
}

/// Check a declared access configuration against the space's position.
///
/// Root spaces accept every field. Nested spaces accept per-subject grants
/// but flag declared visibility or group-level access, which the platform
/// inherits from the root ancestor and silently ignores.
pub fn validate_declaration(
    space: &Space,
    declared: &DeclaredAccess,
) -> Result<ValidationOutcome, ValidationRejected> {
    let mut warnings = Vec::new();

    if !space.is_root() {
        if declared.visibility.is_some() {
            warnings.push(ValidationWarning::RestrictedFieldIgnored {
                space: space.id,
                field: RestrictedField::Visibility,
            });
        }
        if declared.group_access.is_some() {
            warnings.push(ValidationWarning::RestrictedFieldIgnored {
                space: space.id,
                field: RestrictedField::GroupAccess,
            });
        }
    }

    for warning in &warnings {
        warn!(space = %space.id, "{}", warning);
    }

    Ok(ValidationOutcome::from_warnings(warnings))
}

/// Check that a space can be deleted.
///
/// Deletion cascades to descendants, so a space that still has any must be
/// emptied explicitly first.
pub fn validate_delete(space: &Space, descendant_count: usize) -> Result<(), ValidationRejected> {
    if descendant_count > 0 {
        return Err(ValidationRejected::DeleteWithDescendants {
            space: space.id,
            descendants: descendant_count,
        });
    }
    Ok(())
}

/// Check a move of `space` under `new_parent`.
///
/// Always emits the inheritance notice: the moved space adopts the new
/// parent's visibility and group access, so the caller should reconcile
/// effective state afterward instead of treating the change as drift.
pub fn validate_move(space: &Space, new_parent: SpaceId) -> ValidationOutcome {
    let warning = ValidationWarning::MoveInheritance {
        space: space.id,
        new_parent,
    };
    warn!(space = %space.id, new_parent = %new_parent, "{}", warning);
    ValidationOutcome::AcceptedWithWarnings(vec![warning])
}
