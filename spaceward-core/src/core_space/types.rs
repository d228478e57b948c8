//! Type definitions for space identity

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a space, as assigned by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpaceId(Uuid);

impl SpaceId {
    /// Create a new random SpaceId
    pub fn generate() -> Self {
        SpaceId(Uuid::new_v4())
    }

    /// Create a SpaceId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        SpaceId(uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SpaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SpaceId {
    fn from(uuid: Uuid) -> Self {
        SpaceId(uuid)
    }
}

impl FromStr for SpaceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SpaceId(Uuid::parse_str(s)?))
    }
}
