//! Error types for the reconciliation engine

use super::platform::PlatformError;
use crate::core_space::ValidationRejected;
use thiserror::Error;

/// Result type for reconciler operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Fatal reconciliation failures.
///
/// Per-operation grant failures are not in this enum: they are collected
/// into the outcome so the remaining operations still run. Only failures
/// that prevent the engine from establishing ground truth, or pre-flight
/// validation rejections, abort the pass.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Pre-flight validation rejected the declared configuration; no
    /// network call was made
    #[error("validation rejected: {0}")]
    Validation(#[from] ValidationRejected),

    /// Fetching the effective grant snapshot failed; without it there is
    /// no ground truth to return
    #[error("failed to fetch effective grants: {0}")]
    Fetch(#[source] PlatformError),

    /// The platform refused the move itself
    #[error("move failed: {0}")]
    Move(#[source] PlatformError),
}
