//! Remote platform collaborator trait.
//!
//! The engine never speaks HTTP itself; the surrounding transport layer
//! implements this trait against the platform API. Each method is a single
//! bounded request/response; timeouts, cancellation, and retries belong to
//! the implementor, and a cancellation surfaces here as a plain failure.
//! In tests, `test_utils::MockPlatform` implements it in memory.

use crate::core_grant::{GrantSet, SpaceRole, UserId};
use crate::core_space::SpaceId;
use async_trait::async_trait;
use thiserror::Error;

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Failure kinds reported by the remote platform
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    /// Transport-level failure; the request never produced a platform answer
    #[error("remote platform unavailable: {0}")]
    RemoteUnavailable(String),

    /// The referenced space does not exist on the platform
    #[error("space not found: {0}")]
    NotFound(SpaceId),

    /// The platform refused the operation's content
    #[error("remote platform rejected the operation: {reason}")]
    RemoteRejected { reason: String },

    /// Removing this grant would leave the space without any grantee.
    /// Grant another subject access first, or make the space public,
    /// then retry the removal.
    #[error("cannot remove the last grantee of a restricted space; grant another subject access or make the space public, then retry")]
    MinimumGranteeViolation,
}

impl PlatformError {
    /// True for the minimum-one-grantee rejection, which callers surface
    /// with remediation guidance rather than as a hard failure
    pub fn is_minimum_grantee_violation(&self) -> bool {
        matches!(self, PlatformError::MinimumGranteeViolation)
    }
}

/// Grant-mutation surface of the remote workspace platform.
///
/// Every call is an independent remote side effect with no transactional
/// envelope; the reconciler attempts all of them and aggregates failures.
#[async_trait]
pub trait SpacePlatform: Send + Sync {
    /// Fetch the authoritative effective grant set for a space.
    ///
    /// Includes auto-added entries (creator, organization admins) and
    /// grants inherited through groups or nesting.
    async fn fetch_effective_grants(&self, space: &SpaceId) -> PlatformResult<GrantSet>;

    /// Grant `role` to `user` on the space
    async fn add_grant(&self, space: &SpaceId, user: &UserId, role: SpaceRole)
        -> PlatformResult<()>;

    /// Change the role of an existing grant
    async fn update_grant_role(
        &self,
        space: &SpaceId,
        user: &UserId,
        role: SpaceRole,
    ) -> PlatformResult<()>;

    /// Remove a subject's grant.
    ///
    /// Fails with `MinimumGranteeViolation` when the space would be left
    /// without any grantee; the grant then remains in effect remotely.
    async fn remove_grant(&self, space: &SpaceId, user: &UserId) -> PlatformResult<()>;

    /// Re-parent a space. The platform makes the space adopt the new
    /// parent's visibility and group access.
    async fn move_space(&self, space: &SpaceId, new_parent: &SpaceId) -> PlatformResult<()>;
}
