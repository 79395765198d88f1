//! The authenticated user's denormalized profile.
//!
//! INVARIANT
//! =========
//! `user_id` is empty iff nobody is authenticated. The store only offers
//! whole-record `set` and `reset`, so the other fields can never outlive or
//! predate the `user_id` they belong to.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use serde::{Deserialize, Serialize};

use super::storage::IdentityStorage;

/// Storage key the record is persisted under.
pub const STORAGE_KEY: &str = "profile";

/// User profile as sent by the backend session endpoint.
///
/// Every field is required on the wire; a payload missing any of them is
/// rejected as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    #[serde(rename = "isDeleted")]
    pub is_deleted: bool,
    #[serde(rename = "isPremium")]
    pub is_premium: bool,
}

impl Identity {
    /// The "no user" sentinel record.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.user_id.is_empty()
    }
}

/// Owner of the current [`Identity`], written through to storage.
pub struct IdentityStore {
    current: Identity,
    storage: Box<dyn IdentityStorage>,
}

impl IdentityStore {
    /// Restore the persisted record, falling back to the sentinel when the
    /// storage is empty, unreadable, or holds an inconsistent record.
    #[must_use]
    pub fn load(storage: Box<dyn IdentityStorage>) -> Self {
        let current = match storage.load(STORAGE_KEY) {
            Ok(Some(identity)) if identity.is_authenticated() => identity,
            Ok(_) => Identity::empty(),
            Err(e) => {
                tracing::warn!(error = %e, "stored identity unreadable; starting signed out");
                Identity::empty()
            }
        };
        Self { current, storage }
    }

    #[must_use]
    pub fn get(&self) -> &Identity {
        &self.current
    }

    /// Replace the entire record.
    pub fn set(&mut self, identity: Identity) {
        self.current = identity;
        self.persist();
    }

    /// Restore the empty sentinel record.
    pub fn reset(&mut self) {
        self.current = Identity::empty();
        self.persist();
    }

    fn persist(&self) {
        let result = if self.current.is_authenticated() {
            self.storage.save(STORAGE_KEY, &self.current)
        } else {
            self.storage.remove(STORAGE_KEY)
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to persist identity");
        }
    }
}

impl std::fmt::Debug for IdentityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityStore").field("current", &self.current).finish_non_exhaustive()
    }
}
