//! In-memory mock of the remote workspace platform.
//!
//! Implements `SpacePlatform` over plain maps, enforces the platform's
//! minimum-one-grantee rule, and records every accepted mutation in a
//! journal so tests can assert operation ordering. Failures are
//! scriptable: the whole platform can be marked unavailable, and
//! individual subjects can be marked as rejected by the remote side.

use crate::core_grant::{GrantSet, SpaceRole, UserId};
use crate::core_reconcile::{PlatformError, PlatformResult, SpacePlatform};
use crate::core_space::SpaceId;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Scriptable in-memory platform
pub struct MockPlatform {
    grants: Mutex<HashMap<SpaceId, GrantSet>>,
    journal: Mutex<Vec<String>>,
    rejected_subjects: Mutex<HashSet<UserId>>,
    unavailable: AtomicBool,
    enforce_minimum_grantee: bool,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            grants: Mutex::new(HashMap::new()),
            journal: Mutex::new(Vec::new()),
            rejected_subjects: Mutex::new(HashSet::new()),
            unavailable: AtomicBool::new(false),
            enforce_minimum_grantee: true,
        }
    }

    /// Disable the minimum-one-grantee rule for tests that need it
    pub fn without_minimum_grantee_rule(mut self) -> Self {
        self.enforce_minimum_grantee = false;
        self
    }

    /// Seed a space with its current effective grants
    pub fn with_space(self, space: SpaceId, grants: GrantSet) -> Self {
        self.grants.lock().expect("lock poisoned").insert(space, grants);
        self
    }

    /// Make every subsequent call fail with `RemoteUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make add/update calls targeting `user` fail with `RemoteRejected`
    pub fn reject_subject(&self, user: UserId) {
        self.rejected_subjects
            .lock()
            .expect("lock poisoned")
            .insert(user);
    }

    /// Accepted mutations, in the order the platform received them
    pub fn journal(&self) -> Vec<String> {
        self.journal.lock().expect("lock poisoned").clone()
    }

    /// Current grants of a space, if it exists
    pub fn grants_of(&self, space: &SpaceId) -> Option<GrantSet> {
        self.grants.lock().expect("lock poisoned").get(space).cloned()
    }

    fn check_available(&self) -> PlatformResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(PlatformError::RemoteUnavailable(
                "mock platform offline".to_string(),
            ));
        }
        Ok(())
    }

    fn check_subject(&self, user: &UserId) -> PlatformResult<()> {
        if self
            .rejected_subjects
            .lock()
            .expect("lock poisoned")
            .contains(user)
        {
            return Err(PlatformError::RemoteRejected {
                reason: format!("subject {} is not provisioned", user),
            });
        }
        Ok(())
    }

    fn record(&self, entry: String) {
        self.journal.lock().expect("lock poisoned").push(entry);
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpacePlatform for MockPlatform {
    async fn fetch_effective_grants(&self, space: &SpaceId) -> PlatformResult<GrantSet> {
        self.check_available()?;
        self.grants_of(space).ok_or(PlatformError::NotFound(*space))
    }

    async fn add_grant(
        &self,
        space: &SpaceId,
        user: &UserId,
        role: SpaceRole,
    ) -> PlatformResult<()> {
        self.check_available()?;
        self.check_subject(user)?;

        let mut state = self.grants.lock().expect("lock poisoned");
        let grants = state.get_mut(space).ok_or(PlatformError::NotFound(*space))?;
        grants.insert(user.clone(), role);
        drop(state);

        self.record(format!("add {} {}", user, role));
        Ok(())
    }

    async fn update_grant_role(
        &self,
        space: &SpaceId,
        user: &UserId,
        role: SpaceRole,
    ) -> PlatformResult<()> {
        self.check_available()?;
        self.check_subject(user)?;

        let mut state = self.grants.lock().expect("lock poisoned");
        let grants = state.get_mut(space).ok_or(PlatformError::NotFound(*space))?;
        if !grants.contains(user) {
            return Err(PlatformError::RemoteRejected {
                reason: format!("subject {} holds no grant to update", user),
            });
        }
        grants.insert(user.clone(), role);
        drop(state);

        self.record(format!("update {} {}", user, role));
        Ok(())
    }

    async fn remove_grant(&self, space: &SpaceId, user: &UserId) -> PlatformResult<()> {
        self.check_available()?;

        let mut state = self.grants.lock().expect("lock poisoned");
        let grants = state.get_mut(space).ok_or(PlatformError::NotFound(*space))?;
        if !grants.contains(user) {
            return Err(PlatformError::RemoteRejected {
                reason: format!("subject {} holds no grant to remove", user),
            });
        }
        if self.enforce_minimum_grantee && grants.len() == 1 {
            return Err(PlatformError::MinimumGranteeViolation);
        }
        grants.remove(user);
        drop(state);

        self.record(format!("remove {}", user));
        Ok(())
    }

    async fn move_space(&self, space: &SpaceId, new_parent: &SpaceId) -> PlatformResult<()> {
        self.check_available()?;

        let mut state = self.grants.lock().expect("lock poisoned");
        if !state.contains_key(space) {
            return Err(PlatformError::NotFound(*space));
        }
        let parent_grants = state
            .get(new_parent)
            .ok_or(PlatformError::NotFound(*new_parent))?
            .clone();

        // The moved space adopts the new parent's access wholesale
        state.insert(*space, parent_grants);
        drop(state);

        self.record(format!("move {} -> {}", space, new_parent));
        Ok(())
    }
}
