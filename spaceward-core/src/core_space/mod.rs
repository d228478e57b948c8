//! Space model & inheritance validation
//!
//! Spaces are hierarchical, access-controlled containers. A nested space
//! inherits visibility and group-level access from its root ancestor; only
//! its display name and parent reference are mutable through this engine.
//!
//! Everything here is transient per reconciliation pass: the engine owns no
//! space lifecycle and caches nothing between calls.

pub mod space;
pub mod types;
pub mod validator;

pub use space::{AccessClass, DeclaredAccess, Space, SpacePosition, SpaceVisibility};
pub use types::SpaceId;
pub use validator::{
    validate_declaration, validate_delete, validate_move, RestrictedField, ValidationOutcome,
    ValidationRejected, ValidationWarning,
};
