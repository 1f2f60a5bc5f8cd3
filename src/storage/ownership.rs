// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 SokoFresh

//! Ownership enforcement for user-scoped resources.
//!
//! Addresses and value chains may only be mutated by the user that owns them.
//! The lookup primitive here collapses "does not exist" and "owned by someone
//! else" into the same `NotFound` error, so a caller probing ids cannot learn
//! whether a resource exists in another user's account.

use super::{StorageError, StorageResult};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owning user's id.
    fn owner_user_id(&self) -> u64;
}

/// Owned lookup over an optional resource.
///
/// This is the single authorization primitive used by every mutation handler:
/// resolve the resource, then call `owned_by` with the authenticated user's id.
pub trait OwnedLookup<T> {
    /// Return the resource if it exists and belongs to `user_id`.
    ///
    /// # Errors
    /// Returns `StorageError::NotFound` when the resource is absent or owned
    /// by a different user. The two cases are deliberately indistinguishable.
    fn owned_by(self, user_id: u64, resource: &str) -> StorageResult<T>;
}

impl<T: OwnedResource> OwnedLookup<T> for Option<T> {
    fn owned_by(self, user_id: u64, resource: &str) -> StorageResult<T> {
        match self {
            Some(found) if found.owner_user_id() == user_id => Ok(found),
            _ => Err(StorageError::NotFound(resource.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestResource {
        owner: u64,
    }

    impl OwnedResource for TestResource {
        fn owner_user_id(&self) -> u64 {
            self.owner
        }
    }

    #[test]
    fn owned_lookup_passes_for_owner() {
        let resource = Some(TestResource { owner: 7 });
        assert!(resource.owned_by(7, "Resource 1").is_ok());
    }

    #[test]
    fn owned_lookup_fails_for_non_owner() {
        let resource = Some(TestResource { owner: 7 });
        let result = resource.owned_by(8, "Resource 1");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn owned_lookup_fails_for_missing_resource() {
        let resource: Option<TestResource> = None;
        let result = resource.owned_by(7, "Resource 1");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn missing_and_foreign_errors_are_identical() {
        let missing: Option<TestResource> = None;
        let foreign = Some(TestResource { owner: 7 });

        let err_missing = missing.owned_by(8, "Resource 1").unwrap_err();
        let err_foreign = foreign.owned_by(8, "Resource 1").unwrap_err();

        assert_eq!(err_missing.to_string(), err_foreign.to_string());
    }
}
