/*
    reconcile_integration.rs - End-to-end reconciliation scenarios

    Drives the access reconciler against the in-memory mock platform and
    validates the declared-vs-effective contract: ordering, partial
    failure tolerance, idempotence, and inheritance handling.
*/

use spaceward_core::core_grant::{GrantSet, SpaceRole};
use spaceward_core::core_reconcile::{
    AccessReconciler, OperationKind, PlatformError, ReconcileError,
};
use spaceward_core::core_space::{
    DeclaredAccess, RestrictedField, SpaceId, SpaceVisibility, ValidationWarning,
};
use spaceward_core::test_utils::{grant_set, user, MockPlatform, TestSpaceBuilder};
use std::sync::Arc;

/// Declared grants u1:Admin + u2:Viewer against previously declared
/// u1:Editor and effective {u1:Editor, creator:Admin}: one add, one role
/// update, no removals: the creator was never declared, so it is never
/// targeted.
#[tokio::test]
async fn test_add_and_update_without_touching_auto_added_grants() {
    let space = TestSpaceBuilder::new("analytics").restricted().build();
    let platform = Arc::new(MockPlatform::new().with_space(
        space.id,
        grant_set(&[("u1", SpaceRole::Editor), ("creator", SpaceRole::Admin)]),
    ));
    let reconciler = AccessReconciler::new(platform.clone());

    let declared = DeclaredAccess::grants_only(grant_set(&[
        ("u1", SpaceRole::Admin),
        ("u2", SpaceRole::Viewer),
    ]));
    let previously = grant_set(&[("u1", SpaceRole::Editor)]);

    let outcome = reconciler
        .reconcile(&space, &declared, &previously)
        .await
        .unwrap();

    assert_eq!(platform.journal(), vec!["add u2 view", "update u1 full"]);
    assert_eq!(outcome.applied, 2);
    assert!(outcome.operation_errors.is_empty());
    assert!(outcome.warnings.is_empty());

    assert_eq!(outcome.effective.role_of(&user("u1")), Some(SpaceRole::Admin));
    assert_eq!(outcome.effective.role_of(&user("u2")), Some(SpaceRole::Viewer));
    assert_eq!(
        outcome.effective.role_of(&user("creator")),
        Some(SpaceRole::Admin),
        "auto-added creator grant must survive reconciliation"
    );
}

/// A second pass with identical declared grants and no external changes
/// issues no operations.
#[tokio::test]
async fn test_reconcile_is_idempotent() {
    let space = TestSpaceBuilder::new("reports").build();
    let platform = Arc::new(
        MockPlatform::new().with_space(space.id, grant_set(&[("creator", SpaceRole::Admin)])),
    );
    let reconciler = AccessReconciler::new(platform.clone());

    let declared = DeclaredAccess::grants_only(grant_set(&[
        ("u1", SpaceRole::Editor),
        ("u2", SpaceRole::Viewer),
    ]));

    let first = reconciler
        .reconcile(&space, &declared, &GrantSet::new())
        .await
        .unwrap();
    assert_eq!(first.applied, 2);

    // Caller persists the declared set; nothing changed remotely since.
    let second = reconciler
        .reconcile(&space, &declared, &declared.grants)
        .await
        .unwrap();

    assert_eq!(second.applied, 0);
    assert!(second.operation_errors.is_empty());
    assert_eq!(platform.journal().len(), 2, "no operations on second pass");
}

/// Removing the sole remaining grant trips the platform's minimum-grantee
/// rule: the failure is collected per-operation, not fatal, and the grant
/// is still present in the returned ground truth.
#[tokio::test]
async fn test_minimum_grantee_violation_is_recoverable() {
    let space = TestSpaceBuilder::new("private-corner").restricted().build();
    let platform = Arc::new(
        MockPlatform::new().with_space(space.id, grant_set(&[("u1", SpaceRole::Admin)])),
    );
    let reconciler = AccessReconciler::new(platform.clone());

    let declared = DeclaredAccess::grants_only(GrantSet::new());
    let previously = grant_set(&[("u1", SpaceRole::Admin)]);

    let outcome = reconciler
        .reconcile(&space, &declared, &previously)
        .await
        .unwrap();

    assert_eq!(outcome.applied, 0);
    assert_eq!(outcome.operation_errors.len(), 1);
    let err = &outcome.operation_errors[0];
    assert_eq!(err.user, user("u1"));
    assert_eq!(err.kind, OperationKind::Remove);
    assert!(err.error.is_minimum_grantee_violation());

    assert!(
        outcome.effective.contains(&user("u1")),
        "the refused removal must still be visible in ground truth"
    );
}

/// Declaring visibility on a nested space is a warning, and reconciliation
/// proceeds with the grant operations only.
#[tokio::test]
async fn test_nested_space_visibility_declaration_warns() {
    let parent = SpaceId::generate();
    let space = TestSpaceBuilder::new("sub-team").nested_under(parent).build();
    let platform = Arc::new(
        MockPlatform::new().with_space(space.id, grant_set(&[("creator", SpaceRole::Admin)])),
    );
    let reconciler = AccessReconciler::new(platform.clone());

    let declared = DeclaredAccess {
        grants: grant_set(&[("u1", SpaceRole::Viewer)]),
        visibility: Some(SpaceVisibility::Public),
        group_access: None,
    };

    let outcome = reconciler
        .reconcile(&space, &declared, &GrantSet::new())
        .await
        .unwrap();

    assert_eq!(
        outcome.warnings,
        vec![ValidationWarning::RestrictedFieldIgnored {
            space: space.id,
            field: RestrictedField::Visibility,
        }]
    );
    // Only the grant operation reached the platform
    assert_eq!(platform.journal(), vec!["add u1 view"]);
}

/// Operations land in add, update, remove order regardless of subject
/// names.
#[tokio::test]
async fn test_operations_apply_in_add_update_remove_order() {
    let space = TestSpaceBuilder::new("ordered").build();
    let platform = Arc::new(MockPlatform::new().with_space(
        space.id,
        grant_set(&[
            ("a_old", SpaceRole::Viewer),
            ("c_mid", SpaceRole::Viewer),
            ("keeper", SpaceRole::Admin),
        ]),
    ));
    let reconciler = AccessReconciler::new(platform.clone());

    let declared = DeclaredAccess::grants_only(grant_set(&[
        ("b_new", SpaceRole::Editor),
        ("c_mid", SpaceRole::Admin),
    ]));
    let previously = grant_set(&[("a_old", SpaceRole::Viewer), ("c_mid", SpaceRole::Viewer)]);

    let outcome = reconciler
        .reconcile(&space, &declared, &previously)
        .await
        .unwrap();

    assert_eq!(
        platform.journal(),
        vec!["add b_new edit", "update c_mid full", "remove a_old"]
    );
    assert_eq!(outcome.applied, 3);
}

/// One refused operation does not stop the rest; every failure is keyed by
/// subject and kind.
#[tokio::test]
async fn test_partial_failure_attempts_all_operations() {
    let space = TestSpaceBuilder::new("mixed").build();
    let platform = Arc::new(
        MockPlatform::new().with_space(space.id, grant_set(&[("creator", SpaceRole::Admin)])),
    );
    platform.reject_subject(user("bad"));
    let reconciler = AccessReconciler::new(platform.clone());

    let declared = DeclaredAccess::grants_only(grant_set(&[
        ("bad", SpaceRole::Viewer),
        ("good", SpaceRole::Editor),
    ]));

    let outcome = reconciler
        .reconcile(&space, &declared, &GrantSet::new())
        .await
        .unwrap();

    assert_eq!(outcome.applied, 1);
    assert_eq!(outcome.operation_errors.len(), 1);
    assert_eq!(outcome.operation_errors[0].user, user("bad"));
    assert_eq!(outcome.operation_errors[0].kind, OperationKind::Add);
    assert!(matches!(
        outcome.operation_errors[0].error,
        PlatformError::RemoteRejected { .. }
    ));

    assert!(outcome.effective.contains(&user("good")));
    assert!(!outcome.effective.contains(&user("bad")));
}

/// An unreachable platform on the initial fetch is fatal and nothing is
/// attempted.
#[tokio::test]
async fn test_unavailable_platform_fails_before_any_operation() {
    let space = TestSpaceBuilder::new("offline").build();
    let platform = Arc::new(
        MockPlatform::new().with_space(space.id, grant_set(&[("creator", SpaceRole::Admin)])),
    );
    platform.set_unavailable(true);
    let reconciler = AccessReconciler::new(platform.clone());

    let declared = DeclaredAccess::grants_only(grant_set(&[("u1", SpaceRole::Viewer)]));
    let result = reconciler
        .reconcile(&space, &declared, &GrantSet::new())
        .await;

    assert!(matches!(
        result,
        Err(ReconcileError::Fetch(PlatformError::RemoteUnavailable(_)))
    ));
    assert!(platform.journal().is_empty());
}

/// Grants that already converged remotely (out-of-band) produce no
/// operations.
#[tokio::test]
async fn test_drift_already_converged_is_a_no_op() {
    let space = TestSpaceBuilder::new("converged").build();
    let platform = Arc::new(MockPlatform::new().with_space(
        space.id,
        grant_set(&[("u1", SpaceRole::Editor), ("creator", SpaceRole::Admin)]),
    ));
    let reconciler = AccessReconciler::new(platform.clone());

    // Never declared before, but the grant already exists with the right role
    let declared = DeclaredAccess::grants_only(grant_set(&[("u1", SpaceRole::Editor)]));
    let outcome = reconciler
        .reconcile(&space, &declared, &GrantSet::new())
        .await
        .unwrap();

    assert_eq!(outcome.applied, 0);
    assert!(platform.journal().is_empty());
}

/// Moving a space emits the inheritance notice and returns the effective
/// grants adopted from the new parent.
#[tokio::test]
async fn test_move_adopts_parent_access() {
    let parent_id = SpaceId::generate();
    let space = TestSpaceBuilder::new("wanderer").build();
    let platform = Arc::new(
        MockPlatform::new()
            .with_space(space.id, grant_set(&[("old_owner", SpaceRole::Admin)]))
            .with_space(
                parent_id,
                grant_set(&[("team_lead", SpaceRole::Admin), ("analyst", SpaceRole::Viewer)]),
            ),
    );
    let reconciler = AccessReconciler::new(platform.clone());

    let outcome = reconciler.move_space(&space, parent_id).await.unwrap();

    assert_eq!(
        outcome.warnings,
        vec![ValidationWarning::MoveInheritance {
            space: space.id,
            new_parent: parent_id,
        }]
    );
    assert_eq!(
        outcome.effective,
        grant_set(&[("team_lead", SpaceRole::Admin), ("analyst", SpaceRole::Viewer)]),
        "effective grants must reflect the new parent's access"
    );
}

/// An empty declaration against an untouched space leaves auto-added
/// grants alone entirely.
#[tokio::test]
async fn test_empty_declaration_never_touches_effective_grants() {
    let space = TestSpaceBuilder::new("untouched").build();
    let platform = Arc::new(MockPlatform::new().with_space(
        space.id,
        grant_set(&[("creator", SpaceRole::Admin), ("org_admin", SpaceRole::Admin)]),
    ));
    let reconciler = AccessReconciler::new(platform.clone());

    let outcome = reconciler
        .reconcile(
            &space,
            &DeclaredAccess::grants_only(GrantSet::new()),
            &GrantSet::new(),
        )
        .await
        .unwrap();

    assert_eq!(outcome.applied, 0);
    assert!(platform.journal().is_empty());
    assert_eq!(outcome.effective.len(), 2);
}
