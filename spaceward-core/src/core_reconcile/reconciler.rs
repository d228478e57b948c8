//! Access reconciler.
//!
//! Converges a space's effective grants toward the operator's declared
//! grants by issuing per-grant operations against the remote platform.
//! One pass is synchronous and sequential: adds land first, then role
//! updates, then removals, so the space's grantee count never transiently
//! reaches zero while a replacement grantee is still pending.
//!
//! Removals are derived from the previously declared set, never from the
//! full effective set; the engine only ever undoes what it itself asked
//! for, and inherited or auto-added grants stay untouched.

use super::errors::{ReconcileError, ReconcileResult};
use super::metrics::{GRANT_OPS_TOTAL, RECONCILE_OPS_PLANNED, RECONCILE_RUNS_TOTAL};
use super::platform::{PlatformError, SpacePlatform};
use crate::core_grant::{diff, GrantDiff, GrantSet, UserId};
use crate::core_space::{
    validate_declaration, validate_move, DeclaredAccess, Space, SpaceId, ValidationWarning,
};
use metrics::{counter, histogram};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Kind of grant operation attempted against the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Add,
    UpdateRole,
    Remove,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::UpdateRole => "update_role",
            OperationKind::Remove => "remove",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A grant operation the platform refused, keyed by subject and kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationError {
    /// Subject the operation targeted
    pub user: UserId,

    /// What was attempted
    pub kind: OperationKind,

    /// Why the platform refused
    pub error: PlatformError,
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} failed: {}", self.kind, self.user, self.error)
    }
}

/// Result of one reconciliation pass.
///
/// `effective` is always the platform's post-pass ground truth, re-fetched
/// after every operation completed or failed, never what was merely
/// attempted.
#[derive(Debug)]
pub struct ReconcileOutcome {
    /// Authoritative effective grants after the pass
    pub effective: GrantSet,

    /// Number of operations the platform accepted
    pub applied: usize,

    /// Every refused operation; an entry here never aborted the rest
    pub operation_errors: Vec<OperationError>,

    /// Non-fatal validation findings for operator awareness
    pub warnings: Vec<ValidationWarning>,
}

impl ReconcileOutcome {
    /// True if every operation succeeded and validation raised nothing
    pub fn is_clean(&self) -> bool {
        self.operation_errors.is_empty() && self.warnings.is_empty()
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "applied {} operation(s), {} failed, {} warning(s); effective grants: {}",
            self.applied,
            self.operation_errors.len(),
            self.warnings.len(),
            self.effective
        )
    }
}

/// Result of a space move
#[derive(Debug)]
pub struct MoveOutcome {
    /// Effective grants re-fetched after the move, reflecting inherited
    /// access from the new parent
    pub effective: GrantSet,

    /// The inheritance notice for the caller
    pub warnings: Vec<ValidationWarning>,
}

/// Reconciles declared space access against the remote platform.
///
/// Holds only the collaborator handle; all grant state is passed in per
/// call and re-fetched fresh, never cached.
pub struct AccessReconciler {
    platform: Arc<dyn SpacePlatform>,
}

impl AccessReconciler {
    pub fn new(platform: Arc<dyn SpacePlatform>) -> Self {
        Self { platform }
    }

    /// Converge the space's effective grants toward `declared`.
    ///
    /// `previously_declared` is the grant set persisted by the caller from
    /// the last pass; subjects the engine never declared are never removal
    /// targets.
    ///
    /// Fatal failures (validation rejection, unreachable platform on
    /// fetch) return an error; individual grant operations that fail are
    /// collected into the outcome while the remaining operations still run.
    pub async fn reconcile(
        &self,
        space: &Space,
        declared: &DeclaredAccess,
        previously_declared: &GrantSet,
    ) -> ReconcileResult<ReconcileOutcome> {
        let warnings = validate_declaration(space, declared)?.into_warnings();

        let effective = self
            .platform
            .fetch_effective_grants(&space.id)
            .await
            .map_err(ReconcileError::Fetch)?;
        debug!(space = %space.id, effective = %effective, "fetched effective grants");

        let plan = refine_against_effective(
            diff(&declared.grants, previously_declared),
            &effective,
        );
        histogram!(RECONCILE_OPS_PLANNED).record(plan.op_count() as f64);
        debug!(
            space = %space.id,
            to_add = plan.to_add.len(),
            to_update = plan.to_update.len(),
            to_remove = plan.to_remove.len(),
            "planned grant operations"
        );

        let (applied, operation_errors) = self.apply(&space.id, &plan).await;

        let final_effective = match self.platform.fetch_effective_grants(&space.id).await {
            Ok(set) => set,
            Err(e) => {
                warn!(
                    space = %space.id,
                    applied,
                    failed = operation_errors.len(),
                    "ground-truth re-fetch failed after applying operations"
                );
                return Err(ReconcileError::Fetch(e));
            }
        };

        let result = if operation_errors.is_empty() {
            "clean"
        } else {
            "partial"
        };
        counter!(RECONCILE_RUNS_TOTAL, "result" => result).increment(1);
        info!(
            space = %space.id,
            applied,
            failed = operation_errors.len(),
            "reconciliation pass complete"
        );

        Ok(ReconcileOutcome {
            effective: final_effective,
            applied,
            operation_errors,
            warnings,
        })
    }

    /// Re-parent a space and re-fetch its effective grants.
    ///
    /// The platform makes the moved space adopt the new parent's visibility
    /// and group access; the returned snapshot lets the caller record the
    /// inherited state instead of observing it as drift on the next pass.
    pub async fn move_space(
        &self,
        space: &Space,
        new_parent: SpaceId,
    ) -> ReconcileResult<MoveOutcome> {
        let warnings = validate_move(space, new_parent).into_warnings();

        self.platform
            .move_space(&space.id, &new_parent)
            .await
            .map_err(ReconcileError::Move)?;

        let effective = self
            .platform
            .fetch_effective_grants(&space.id)
            .await
            .map_err(ReconcileError::Fetch)?;

        info!(space = %space.id, new_parent = %new_parent, "space moved");
        Ok(MoveOutcome {
            effective,
            warnings,
        })
    }

    /// Issue the planned operations in add, update, remove order.
    ///
    /// Every operation is attempted regardless of earlier failures; each
    /// failure is recorded against its subject and kind.
    async fn apply(&self, space: &SpaceId, plan: &GrantDiff) -> (usize, Vec<OperationError>) {
        let mut applied = 0;
        let mut errors = Vec::new();

        for grant in &plan.to_add {
            let result = self.platform.add_grant(space, &grant.user, grant.role).await;
            self.record(space, &grant.user, OperationKind::Add, result, &mut applied, &mut errors);
        }

        for grant in &plan.to_update {
            let result = self
                .platform
                .update_grant_role(space, &grant.user, grant.role)
                .await;
            self.record(
                space,
                &grant.user,
                OperationKind::UpdateRole,
                result,
                &mut applied,
                &mut errors,
            );
        }

        for user in &plan.to_remove {
            let result = self.platform.remove_grant(space, user).await;
            self.record(space, user, OperationKind::Remove, result, &mut applied, &mut errors);
        }

        (applied, errors)
    }

    fn record(
        &self,
        space: &SpaceId,
        user: &UserId,
        kind: OperationKind,
        result: Result<(), PlatformError>,
        applied: &mut usize,
        errors: &mut Vec<OperationError>,
    ) {
        match result {
            Ok(()) => {
                counter!(GRANT_OPS_TOTAL, "kind" => kind.as_str(), "result" => "ok").increment(1);
                info!(space = %space, user = %user, kind = %kind, "grant operation applied");
                *applied += 1;
            }
            Err(error) => {
                counter!(GRANT_OPS_TOTAL, "kind" => kind.as_str(), "result" => "error")
                    .increment(1);
                warn!(space = %space, user = %user, kind = %kind, error = %error, "grant operation failed");
                errors.push(OperationError {
                    user: user.clone(),
                    kind,
                    error,
                });
            }
        }
    }
}

/// Refine a declared-vs-previous plan against the fetched effective set.
///
/// Already-satisfied operations are dropped, an add whose subject already
/// holds a different role becomes a role update, an update whose subject
/// vanished becomes an add, and a removal whose subject is already gone is
/// skipped. Keeps the pass idempotent and drift-tolerant without ever
/// widening the removal set beyond previously declared subjects.
fn refine_against_effective(plan: GrantDiff, effective: &GrantSet) -> GrantDiff {
    let mut refined = GrantDiff::default();

    for grant in plan.to_add.into_iter().chain(plan.to_update) {
        match effective.role_of(&grant.user) {
            None => refined.to_add.push(grant),
            Some(held) if held != grant.role => refined.to_update.push(grant),
            Some(_) => {}
        }
    }

    for user in plan.to_remove {
        if effective.contains(&user) {
            refined.to_remove.push(user);
        }
    }

    refined.to_add.sort_by(|a, b| a.user.cmp(&b.user));
    refined.to_update.sort_by(|a, b| a.user.cmp(&b.user));
    refined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_grant::{SpaceGrant, SpaceRole};

    fn set(pairs: &[(&str, SpaceRole)]) -> GrantSet {
        pairs
            .iter()
            .map(|(user, role)| (UserId::from(*user), *role))
            .collect()
    }

    #[test]
    fn test_refine_drops_satisfied_adds() {
        let plan = GrantDiff {
            to_add: vec![SpaceGrant::new("u1", SpaceRole::Viewer)],
            ..Default::default()
        };
        let effective = set(&[("u1", SpaceRole::Viewer)]);

        assert!(refine_against_effective(plan, &effective).is_empty());
    }

    #[test]
    fn test_refine_demotes_add_to_update_when_role_differs() {
        let plan = GrantDiff {
            to_add: vec![SpaceGrant::new("u1", SpaceRole::Admin)],
            ..Default::default()
        };
        let effective = set(&[("u1", SpaceRole::Viewer)]);

        let refined = refine_against_effective(plan, &effective);
        assert!(refined.to_add.is_empty());
        assert_eq!(refined.to_update, vec![SpaceGrant::new("u1", SpaceRole::Admin)]);
    }

    #[test]
    fn test_refine_promotes_update_to_add_when_subject_vanished() {
        let plan = GrantDiff {
            to_update: vec![SpaceGrant::new("u1", SpaceRole::Editor)],
            ..Default::default()
        };

        let refined = refine_against_effective(plan, &GrantSet::new());
        assert_eq!(refined.to_add, vec![SpaceGrant::new("u1", SpaceRole::Editor)]);
        assert!(refined.to_update.is_empty());
    }

    #[test]
    fn test_refine_skips_removal_of_absent_subject() {
        let plan = GrantDiff {
            to_remove: vec![UserId::from("gone")],
            ..Default::default()
        };

        assert!(refine_against_effective(plan, &GrantSet::new()).is_empty());
    }

    #[test]
    fn test_refine_keeps_outputs_ascending() {
        let plan = GrantDiff {
            to_add: vec![SpaceGrant::new("zed", SpaceRole::Viewer)],
            to_update: vec![SpaceGrant::new("amy", SpaceRole::Editor)],
            ..Default::default()
        };
        // amy vanished remotely, so her update becomes an add after zed's
        let refined = refine_against_effective(plan, &GrantSet::new());

        let added: Vec<&str> = refined.to_add.iter().map(|g| g.user.as_str()).collect();
        assert_eq!(added, vec!["amy", "zed"]);
    }

    #[test]
    fn test_operation_kind_display() {
        assert_eq!(OperationKind::Add.to_string(), "add");
        assert_eq!(OperationKind::UpdateRole.to_string(), "update_role");
        assert_eq!(OperationKind::Remove.to_string(), "remove");
    }
}
