//! Owner/admin role registry
//!
//! Roles form a small closed set: the owner (fixed at construction, never
//! reassigned), admins (granted and revoked by the owner), and everyone
//! else. Admin status is a capability for claim resolution and policy
//! creation, not ownership; owner-only operations stay owner-only.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::error::LedgerError;
use crate::types::policy_types::Principal;

/// Role registry with a fixed owner and a mutable admin set
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleRegistry {
    /// The contract owner, set at creation
    owner: Principal,
    /// Principals granted admin capability by the owner
    admins: HashSet<Principal>,
}

impl RoleRegistry {
    /// Create a registry owned by `owner` with an empty admin set
    pub fn new(owner: Principal) -> Self {
        Self {
            owner,
            admins: HashSet::new(),
        }
    }

    /// The fixed owner principal
    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    /// True if `principal` is the owner
    pub fn is_owner(&self, principal: &Principal) -> bool {
        *principal == self.owner
    }

    /// True if `principal` may perform admin-gated operations
    ///
    /// The owner is implicitly an admin.
    pub fn is_admin(&self, principal: &Principal) -> bool {
        self.is_owner(principal) || self.admins.contains(principal)
    }

    /// Grant admin capability to `principal`; owner-only, idempotent
    pub fn add_admin(&mut self, caller: &Principal, principal: Principal) -> Result<(), LedgerError> {
        self.require_owner(caller, "add admin")?;

        if self.admins.insert(principal.clone()) {
            info!(admin = %principal, "admin added");
        }
        Ok(())
    }

    /// Revoke admin capability from `principal`; owner-only, idempotent
    ///
    /// The owner cannot be demoted: ownership is not an `admins` entry.
    pub fn remove_admin(
        &mut self,
        caller: &Principal,
        principal: &Principal,
    ) -> Result<(), LedgerError> {
        self.require_owner(caller, "remove admin")?;

        if self.is_owner(principal) {
            return Err(LedgerError::invalid_argument(
                "owner role cannot be revoked",
            ));
        }
        if self.admins.remove(principal) {
            info!(admin = %principal, "admin removed");
        }
        Ok(())
    }

    /// Fail with `Unauthorized` unless `caller` is the owner
    pub fn require_owner(&self, caller: &Principal, action: &str) -> Result<(), LedgerError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(LedgerError::unauthorized(format!(
                "{} requires owner, caller is {}",
                action, caller
            )))
        }
    }

    /// Fail with `Unauthorized` unless `caller` is the owner or an admin
    pub fn require_admin(&self, caller: &Principal, action: &str) -> Result<(), LedgerError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(LedgerError::unauthorized(format!(
                "{} requires admin, caller is {}",
                action, caller
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Principal {
        "owner".to_string()
    }

    #[test]
    fn owner_is_implicitly_admin() {
        let roles = RoleRegistry::new(owner());
        assert!(roles.is_admin(&owner()));
        assert!(!roles.is_admin(&"stranger".to_string()));
    }

    #[test]
    fn add_admin_is_owner_only_and_idempotent() {
        let mut roles = RoleRegistry::new(owner());
        let alice = "alice".to_string();

        let err = roles.add_admin(&alice, alice.clone()).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { .. }));

        roles.add_admin(&owner(), alice.clone()).unwrap();
        assert!(roles.is_admin(&alice));
        // Re-adding is a no-op, not an error
        roles.add_admin(&owner(), alice.clone()).unwrap();
        assert!(roles.is_admin(&alice));
    }

    #[test]
    fn remove_admin_revokes_capability() {
        let mut roles = RoleRegistry::new(owner());
        let alice = "alice".to_string();
        roles.add_admin(&owner(), alice.clone()).unwrap();

        roles.remove_admin(&owner(), &alice).unwrap();
        assert!(!roles.is_admin(&alice));
        // Idempotent
        roles.remove_admin(&owner(), &alice).unwrap();

        let err = roles.remove_admin(&alice, &alice).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { .. }));
    }

    #[test]
    fn owner_cannot_be_demoted() {
        let mut roles = RoleRegistry::new(owner());
        let err = roles.remove_admin(&owner(), &owner()).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidArgument(_)));
        assert!(roles.is_admin(&owner()));
    }
}
